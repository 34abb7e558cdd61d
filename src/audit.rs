use std::collections::BTreeMap;
use std::io::Write;
use tracing::debug;

use crate::aws::{Inventory, LoadBalancer, SecurityGroupRule};
use crate::error::AuditError;

/// Description prefix the Kubernetes cloud provider puts on NLB client rules.
pub const NLB_CLIENT_RULE_PREFIX: &str = "kubernetes.io/rule/nlb/client";

pub fn expected_rule_key(load_balancer_name: &str) -> String {
    format!("{}={}", NLB_CLIENT_RULE_PREFIX, load_balancer_name)
}

/// Expected client rule descriptions, one per NLB, with how many rules
/// carry each of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedNlbSet {
    counts: BTreeMap<String, usize>,
}

impl ExpectedNlbSet {
    pub fn from_load_balancers(load_balancers: &[LoadBalancer]) -> Self {
        let mut counts = BTreeMap::new();

        for lb in load_balancers {
            if lb.is_network() {
                counts.insert(expected_rule_key(&lb.load_balancer_name), 0);
            } else {
                debug!(
                    "skipping {} ({})",
                    lb.load_balancer_name,
                    lb.lb_type.as_deref().unwrap_or("unknown")
                );
            }
        }

        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Tally matching rules. Returns the prefixed descriptions that match no
    /// expected key, in rule order.
    pub fn reconcile(&mut self, rules: &[SecurityGroupRule]) -> Vec<String> {
        let mut unmatched = Vec::new();

        for rule in rules {
            let Some(description) = rule.description.as_deref() else {
                continue;
            };

            if !description.starts_with(NLB_CLIENT_RULE_PREFIX) {
                continue;
            }

            match self.counts.get_mut(description) {
                Some(count) => *count += 1,
                None => {
                    debug!(
                        "rule {} has no matching NLB",
                        rule.security_group_rule_id.as_deref().unwrap_or("-")
                    );
                    unmatched.push(description.to_string());
                }
            }
        }

        unmatched
    }

    pub fn write_report<W: Write>(
        &self,
        unmatched: &[String],
        out: &mut W,
    ) -> std::io::Result<()> {
        for description in unmatched {
            writeln!(out, "didn't find {}", description)?;
        }
        writeln!(out, "There are {} NLBs", self.len())?;
        writeln!(out, "{:?}", self.counts)?;
        Ok(())
    }
}

/// List NLBs, fetch the group's rules, reconcile and print the report.
///
/// Both listing calls finish before anything is written, so a failure leaves
/// `out` untouched.
pub fn run_audit<I: Inventory, W: Write>(
    inventory: &I,
    group_id: &str,
    out: &mut W,
) -> Result<ExpectedNlbSet, AuditError> {
    let load_balancers = inventory.load_balancers()?;
    let mut expected = ExpectedNlbSet::from_load_balancers(&load_balancers);

    let rules = inventory.security_group_rules(group_id)?;
    let unmatched = expected.reconcile(&rules);

    expected.write_report(&unmatched, out)?;

    Ok(expected)
}
