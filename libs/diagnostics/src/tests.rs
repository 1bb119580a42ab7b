use test_log::test;

use crate::*;

#[derive(Debug, Clone)]
pub struct TestIssue {
    severity: Severity,
}

impl Display for TestIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bend radius below {} threshold", self.severity)
    }
}

impl Diagnostic for TestIssue {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn help(&self) -> Option<Box<dyn Display>> {
        matches!(self.severity, Severity::Error)
            .then(|| Box::new("increase the radius") as Box<dyn Display>)
    }
}

impl From<Severity> for TestIssue {
    fn from(severity: Severity) -> Self {
        Self { severity }
    }
}

#[test]
fn issue_set_counters() {
    let mut issues: IssueSet<TestIssue> = IssueSet::new();
    issues.add(Severity::Info.into());
    assert_eq!(issues.num_errors(), 0);
    assert_eq!(issues.num_warnings(), 0);
    issues.add_and_log(Severity::Warning.into());
    assert_eq!(issues.num_errors(), 0);
    assert_eq!(issues.num_warnings(), 1);
    issues.extend([Severity::Error.into(), Severity::Warning.into()]);
    assert_eq!(issues.num_errors(), 1);
    assert_eq!(issues.num_warnings(), 2);
    assert_eq!(issues.len(), 4);
}

#[test]
fn at_least_filters_by_severity() {
    let mut issues: IssueSet<TestIssue> = IssueSet::new();
    issues.extend([
        Severity::Info.into(),
        Severity::Warning.into(),
        Severity::Error.into(),
    ]);
    assert_eq!(issues.at_least(Severity::Warning).count(), 2);
    assert_eq!(issues.at_least(Severity::Error).count(), 1);
}

#[test]
fn take_resets_counters() {
    let mut issues: IssueSet<TestIssue> = IssueSet::new();
    issues.add(Severity::Error.into());
    let taken = issues.take();
    assert_eq!(taken.len(), 1);
    assert!(issues.is_empty());
    assert_eq!(issues.num_errors(), 0);
}

#[test]
fn display_includes_severity_and_help() {
    let mut issues: IssueSet<TestIssue> = IssueSet::new();
    issues.add(Severity::Error.into());
    let rendered = issues.to_string();
    assert!(rendered.starts_with("error: bend radius"));
    assert!(rendered.contains("help: increase the radius"));
}

#[test]
fn default_severity_is_warning() {
    assert_eq!(Severity::default(), Severity::Warning);
}

#[test]
fn severity_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&Severity::Warning).unwrap(),
        "\"warning\""
    );
}
