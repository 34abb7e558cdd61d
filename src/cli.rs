use clap::Parser;
use std::ffi::OsString;

#[derive(Parser, Debug)]
#[command(name = "nlb-rule-audit", version)]
#[command(about = "Count Kubernetes NLB client rules in a security group", long_about = None)]
pub struct Cli {
    /// Security group id (e.g., sg-0123456789abcdef0)
    #[arg(long = "group-id", env = "NLB_AUDIT_GROUP_ID", value_name = "ID")]
    pub group_id: Option<String>,
}

/// Rewrite Go-style single-dash `-group-id` into clap's `--group-id`.
/// Arguments that are not valid UTF-8 pass through for clap to report.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg = arg.into();
            match arg.to_str() {
                Some(s) if i > 0 && (s == "-group-id" || s.starts_with("-group-id=")) => {
                    OsString::from(format!("-{}", s))
                }
                _ => arg,
            }
        })
        .collect()
}
