use serde::Deserialize;
use std::process::Command;
use tracing::{debug, info};

use crate::error::AuditError;

/// `Type` reported by elbv2 for Network Load Balancers.
pub const NETWORK_LOAD_BALANCER_TYPE: &str = "network";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    pub load_balancer_name: String,
    #[serde(rename = "Type")]
    pub lb_type: Option<String>,
}

impl LoadBalancer {
    pub fn is_network(&self) -> bool {
        self.lb_type.as_deref() == Some(NETWORK_LOAD_BALANCER_TYPE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupRule {
    pub security_group_rule_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeLoadBalancersOutput {
    #[serde(default)]
    load_balancers: Vec<LoadBalancer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSecurityGroupRulesOutput {
    #[serde(default)]
    security_group_rules: Vec<SecurityGroupRule>,
}

/// The two read-only listing calls the audit needs.
pub trait Inventory {
    fn load_balancers(&self) -> Result<Vec<LoadBalancer>, AuditError>;

    fn security_group_rules(&self, group_id: &str) -> Result<Vec<SecurityGroupRule>, AuditError>;
}

/// Inventory backed by the `aws` command line client.
///
/// Credentials, region and profile are resolved by the client's default
/// chain. The client pages through results on its own, so every call
/// returns the full result set.
pub struct AwsCli {
    program: String,
}

impl AwsCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[String]) -> Result<(String, Vec<u8>), AuditError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| AuditError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AuditError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok((command, output.stdout))
    }
}

impl Inventory for AwsCli {
    fn load_balancers(&self) -> Result<Vec<LoadBalancer>, AuditError> {
        let (command, stdout) = self.run(&load_balancer_args())?;
        let load_balancers = parse_load_balancers(&command, &stdout)?;
        info!("described {} load balancer(s)", load_balancers.len());
        Ok(load_balancers)
    }

    fn security_group_rules(&self, group_id: &str) -> Result<Vec<SecurityGroupRule>, AuditError> {
        let (command, stdout) = self.run(&security_group_rule_args(group_id))?;
        let rules = parse_security_group_rules(&command, &stdout)?;
        info!("described {} rule(s) in {}", rules.len(), group_id);
        Ok(rules)
    }
}

pub fn load_balancer_args() -> Vec<String> {
    ["elbv2", "describe-load-balancers", "--output", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn security_group_rule_args(group_id: &str) -> Vec<String> {
    vec![
        "ec2".to_string(),
        "describe-security-group-rules".to_string(),
        "--filters".to_string(),
        format!("Name=group-id,Values={}", group_id),
        "--output".to_string(),
        "json".to_string(),
    ]
}

pub fn parse_load_balancers(command: &str, stdout: &[u8]) -> Result<Vec<LoadBalancer>, AuditError> {
    let output: DescribeLoadBalancersOutput =
        serde_json::from_slice(stdout).map_err(|source| AuditError::Parse {
            command: command.to_string(),
            source,
        })?;
    Ok(output.load_balancers)
}

pub fn parse_security_group_rules(
    command: &str,
    stdout: &[u8],
) -> Result<Vec<SecurityGroupRule>, AuditError> {
    let output: DescribeSecurityGroupRulesOutput =
        serde_json::from_slice(stdout).map_err(|source| AuditError::Parse {
            command: command.to_string(),
            source,
        })?;
    Ok(output.security_group_rules)
}
