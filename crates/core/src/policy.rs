//! Bucket policy documents
//!
//! Policies attached to buckets are opaque JSON strings to the rest of the
//! crate. This module only builds new ones: a [`PolicyTemplate`] names the
//! principal, actions and effect, and renders a single-statement
//! [`PolicyDocument`] scoped to every object in one bucket.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Policy language version understood by the provider
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement id used by the public-read template
pub const PUBLIC_READ_SID: &str = "AddPerm";

/// Action granted by the public-read template
pub const GET_OBJECT_ACTION: &str = "s3:GetObject";

/// Default ARN partition
pub const DEFAULT_PARTITION: &str = "aws";

/// A bucket policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Serialize to the compact JSON sent to the provider
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A single policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    pub principal: Principal,
    pub action: Vec<String>,
    pub resource: String,
}

/// Whether a statement grants or denies its actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::Allow => write!(f, "Allow"),
            Effect::Deny => write!(f, "Deny"),
        }
    }
}

impl std::str::FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Effect::Allow),
            "deny" => Ok(Effect::Deny),
            _ => Err(format!("Invalid effect: {s} (expected Allow or Deny)")),
        }
    }
}

/// Who a statement applies to
///
/// Serializes as `"*"` for everyone, or `{"AWS": [...]}` for a list of
/// account or role ARNs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Any,
    Aws(Vec<String>),
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Principal::Any => serializer.serialize_str("*"),
            Principal::Aws(arns) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("AWS", arns)?;
                map.end()
            }
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::Any => write!(f, "*"),
            Principal::Aws(arns) => write!(f, "{}", arns.join(",")),
        }
    }
}

impl std::str::FromStr for Principal {
    type Err = String;

    /// `*` means everyone; anything else is a comma-separated list of ARNs
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Principal cannot be empty".to_string());
        }
        if s == "*" {
            return Ok(Principal::Any);
        }
        let arns: Vec<String> = s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Ok(Principal::Aws(arns))
    }
}

/// Parameters for a single-statement bucket policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTemplate {
    pub sid: Option<String>,
    pub effect: Effect,
    pub principal: Principal,
    pub actions: Vec<String>,
    pub partition: String,
}

impl PolicyTemplate {
    /// Anyone may read every object in the bucket
    pub fn public_read() -> Self {
        Self {
            sid: Some(PUBLIC_READ_SID.to_string()),
            effect: Effect::Allow,
            principal: Principal::Any,
            actions: vec![GET_OBJECT_ACTION.to_string()],
            partition: DEFAULT_PARTITION.to_string(),
        }
    }

    pub fn with_sid(mut self, sid: Option<String>) -> Self {
        self.sid = sid;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    /// Check the template can produce a usable statement
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(Error::Config("Policy needs at least one action".to_string()));
        }
        if let Some(action) = self.actions.iter().find(|a| a.trim().is_empty()) {
            return Err(Error::Config(format!("Invalid policy action: '{action}'")));
        }
        if let Principal::Aws(arns) = &self.principal
            && arns.is_empty()
        {
            return Err(Error::Config("Policy principal list is empty".to_string()));
        }
        if self.partition.is_empty() {
            return Err(Error::Config("ARN partition cannot be empty".to_string()));
        }
        Ok(())
    }

    /// ARN covering every object in `bucket`
    pub fn resource_arn(&self, bucket: &str) -> String {
        format!("arn:{}:s3:::{bucket}/*", self.partition)
    }

    /// Render the policy document for `bucket`
    pub fn render(&self, bucket: &str) -> PolicyDocument {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                sid: self.sid.clone(),
                effect: self.effect,
                principal: self.principal.clone(),
                action: self.actions.clone(),
                resource: self.resource_arn(bucket),
            }],
        }
    }
}

impl Default for PolicyTemplate {
    fn default() -> Self {
        Self::public_read()
    }
}
