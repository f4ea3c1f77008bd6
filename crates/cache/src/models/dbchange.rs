/// Provenance of the snapshot: when each entity family last changed and when
/// the snapshot was exported. Values are kept exactly as the exporter wrote
/// them.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DbChange {
    pub errata_changes: String,
    pub cve_changes: String,
    pub repository_changes: String,
    pub last_change: String,
    pub exported: String,
}
