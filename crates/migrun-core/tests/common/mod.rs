use migrun_core::model::{AppliedMigration, LedgerRecord};
use migrun_core::{MigrationTarget, Result};
use std::fs;
use std::path::Path;

/// Target that keeps its ledger in memory and records every script it ran
#[derive(Debug, Default)]
pub struct MemoryTarget {
    pub rows: Vec<(String, AppliedMigration)>,
    pub scripts: Vec<String>,
}

impl MigrationTarget for MemoryTarget {
    fn ensure_ledger(&mut self) -> Result<()> {
        Ok(())
    }

    fn load_history(&mut self, app_id: &str) -> Result<Vec<AppliedMigration>> {
        Ok(self
            .rows
            .iter()
            .filter(|(app, _)| app == app_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    fn execute_script(&mut self, sql: &str) -> Result<()> {
        self.scripts.push(sql.to_string());
        Ok(())
    }

    fn record_applied(&mut self, record: &LedgerRecord<'_>) -> Result<()> {
        self.rows.push((
            record.app_id.to_string(),
            AppliedMigration::new(record.path, record.hash),
        ));
        Ok(())
    }
}

/// Write a file below `root`, creating parent directories
#[allow(dead_code)]
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
