use std::env;

use crate::cli::Cli;
use crate::error::AuditError;

/// Overrides the AWS command line client used for the listing calls.
pub const AWS_CLI_ENV: &str = "NLB_AUDIT_AWS_CLI";
pub const DEFAULT_AWS_CLI: &str = "aws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub group_id: String,
    pub aws_cli: String,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, AuditError> {
        Self::resolve(cli.group_id, env::var(AWS_CLI_ENV).ok())
    }

    fn resolve(group_id: Option<String>, aws_cli: Option<String>) -> Result<Self, AuditError> {
        let group_id = group_id
            .filter(|id| !id.is_empty())
            .ok_or(AuditError::MissingGroupId)?;

        let aws_cli = aws_cli
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AWS_CLI.to_string());

        Ok(Self { group_id, aws_cli })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_group_id() {
        let err = Config::resolve(None, None).unwrap_err();
        assert_eq!(err.to_string(), "-group-id is required");
    }

    #[test]
    fn test_empty_group_id_is_missing() {
        let err = Config::resolve(Some(String::new()), None).unwrap_err();
        assert!(matches!(err, AuditError::MissingGroupId));
    }

    #[test]
    fn test_default_aws_cli() {
        let config = Config::resolve(Some("sg-1".to_string()), Some("  ".to_string())).unwrap();

        assert_eq!(config.group_id, "sg-1");
        assert_eq!(config.aws_cli, DEFAULT_AWS_CLI);
    }

    #[test]
    fn test_aws_cli_override() {
        let config = Config::resolve(
            Some("sg-1".to_string()),
            Some("/opt/awscli/v2/current/bin/aws".to_string()),
        )
        .unwrap();

        assert_eq!(config.aws_cli, "/opt/awscli/v2/current/bin/aws");
    }
}
