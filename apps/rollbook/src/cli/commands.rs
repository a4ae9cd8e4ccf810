//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{Cli, CliError};
use crate::api::{self, CountResponse, SeedResponse, StudentJson};
use crate::config::{BackendKind, RollbookConfig};
use rollbook_core::{
    Registry, Roll, StudentDraft, StudentPatch, StudentRecord, primitives::MARK_COUNT, query,
    seed,
};
use std::path::Path;

// =============================================================================
// CONTEXT
// =============================================================================

/// Resolved configuration plus output mode for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: RollbookConfig,
    pub json_mode: bool,
}

impl CliContext {
    /// Load config layers and apply global CLI flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let mut config = RollbookConfig::load(cli.config.as_deref())?;
        if let Some(database) = &cli.database {
            config.storage.database.clone_from(database);
        }
        if let Some(backend) = &cli.backend {
            config.storage.backend = backend.parse()?;
        }
        config.validate()?;
        Ok(Self {
            config,
            json_mode: cli.json_mode,
        })
    }

    fn backend(&self) -> BackendKind {
        self.config.storage.backend
    }

    fn database(&self) -> &Path {
        &self.config.storage.database
    }

    /// Open the configured registry.
    pub fn open_registry(&self) -> Result<Registry, CliError> {
        if self.backend() == BackendKind::Memory {
            tracing::warn!("Using the memory backend: changes are discarded on exit");
        }
        Ok(self.backend().open(self.database())?)
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut ctx: CliContext,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CliError> {
    if let Some(host) = host {
        ctx.config.server.host = host;
    }
    if let Some(port) = port {
        ctx.config.server.port = port;
    }
    ctx.config.validate()?;

    let registry = ctx.open_registry()?;
    let config = &ctx.config;

    println!("Rollbook Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Backend:  {}", config.storage.backend);
    println!("  Database: {}", config.storage.database.display());
    println!();
    println!("Endpoints:");
    println!("  GET    /api/students         - List students");
    println!("  GET    /api/students/sorted  - Ranked by percentage");
    println!("  GET    /api/students/count   - Count students");
    println!("  GET    /api/students/{{roll}}  - Show a student");
    println!("  POST   /api/students         - Add a student");
    println!("  PUT    /api/students/{{roll}}  - Update a student");
    println!("  DELETE /api/students/{{roll}}  - Delete a student");
    println!("  POST   /api/students/dummy   - Load sample students");
    println!("  GET    /health               - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.listen_addr(), registry, &config.api_settings()).await?;
    Ok(())
}

// =============================================================================
// STATUS / COUNT COMMANDS
// =============================================================================

/// Show database status.
pub fn cmd_status(ctx: &CliContext) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let count = query::get_count(&registry)?;

    if ctx.json_mode {
        let output = serde_json::json!({
            "database": ctx.database().to_string_lossy(),
            "backend": ctx.backend().as_str(),
            "count": count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Rollbook Status");
    println!("===============");
    println!("Database: {}", ctx.database().display());
    println!("Backend:  {}", ctx.backend());
    println!();
    println!("Students: {}", count);

    Ok(())
}

/// Print the number of students.
pub fn cmd_count(ctx: &CliContext) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let count = query::get_count(&registry)?;

    if ctx.json_mode {
        print_json(&CountResponse { count });
    } else {
        println!("{}", count);
    }
    Ok(())
}

// =============================================================================
// READ COMMANDS
// =============================================================================

/// List students in insertion order or ranked.
pub fn cmd_list(ctx: &CliContext, sorted: bool) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let records = if sorted {
        query::list_sorted(&registry)?
    } else {
        query::list_all(&registry)?
    };

    if ctx.json_mode {
        print_json(&StudentJson::from_records(&records));
        return Ok(());
    }

    if records.is_empty() {
        println!("No students found.");
        return Ok(());
    }
    print_table(&records, sorted);
    Ok(())
}

/// Show one student.
pub fn cmd_show(ctx: &CliContext, roll: u64) -> Result<(), CliError> {
    let registry = ctx.open_registry()?;
    let record = query::get_one(&registry, Roll(roll))?;
    print_record(ctx, &record);
    Ok(())
}

// =============================================================================
// WRITE COMMANDS
// =============================================================================

/// Add a student.
pub fn cmd_add(
    ctx: &CliContext,
    roll: u64,
    name: String,
    age: u32,
    branch: String,
    marks: Option<&str>,
) -> Result<(), CliError> {
    let marks = match marks {
        Some(raw) => parse_marks(raw)?.map(|m| m.unwrap_or(0)),
        None => [0; MARK_COUNT],
    };
    let draft = StudentDraft::new(Roll(roll))
        .with_name(name)
        .with_age(age)
        .with_branch(branch)
        .with_marks(marks);
    if draft.has_out_of_range_marks() {
        tracing::warn!(event = "marks_clamped", roll, "Marks outside 0..=100 were clamped");
    }

    let mut registry = ctx.open_registry()?;
    let record = registry.create(draft)?;
    tracing::info!(event = "student_created", roll, grade = %record.grade());
    print_record(ctx, &record);
    Ok(())
}

/// Update a student.
pub fn cmd_update(
    ctx: &CliContext,
    roll: u64,
    name: Option<String>,
    age: Option<u32>,
    branch: Option<String>,
    marks: Option<&str>,
) -> Result<(), CliError> {
    let patch = StudentPatch {
        name,
        age,
        branch,
        marks: marks.map(parse_marks).transpose()?.unwrap_or_default(),
    };
    if patch.is_empty() {
        return Err(CliError::Usage(
            "nothing to update: pass at least one of --name, --age, --branch, --marks".to_string(),
        ));
    }
    if patch.has_out_of_range_marks() {
        tracing::warn!(event = "marks_clamped", roll, "Marks outside 0..=100 were clamped");
    }

    let mut registry = ctx.open_registry()?;
    let record = registry.update(Roll(roll), &patch)?;
    tracing::info!(event = "student_updated", roll, grade = %record.grade());
    print_record(ctx, &record);
    Ok(())
}

/// Delete a student.
pub fn cmd_delete(ctx: &CliContext, roll: u64) -> Result<(), CliError> {
    let mut registry = ctx.open_registry()?;
    registry.delete(Roll(roll))?;
    tracing::info!(event = "student_deleted", roll);

    if ctx.json_mode {
        print_json(&serde_json::json!({ "message": format!("Student {roll} deleted") }));
    } else {
        println!("Student {} deleted", roll);
    }
    Ok(())
}

/// Load the sample batch.
pub fn cmd_seed(ctx: &CliContext) -> Result<(), CliError> {
    let mut registry = ctx.open_registry()?;
    let report = seed(&mut registry)?;
    tracing::info!(
        event = "seed_loaded",
        added = report.added,
        skipped = report.skipped.len()
    );

    if ctx.json_mode {
        print_json(&SeedResponse::from(&report));
    } else {
        println!("{}", report.message());
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(ctx: &CliContext, force: bool) -> Result<(), CliError> {
    if ctx.backend() == BackendKind::Memory {
        println!("Memory backend selected; nothing to initialize.");
        return Ok(());
    }

    let db_path = ctx.database();
    if db_path.exists() {
        if !force {
            return Err(CliError::Usage(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path).map_err(|e| {
            CliError::Usage(format!("Cannot remove {}: {}", db_path.display(), e))
        })?;
    }

    let _registry = Registry::with_redb(db_path)?;
    println!("Initialized new redb database at {}", db_path.display());
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Parse `a,b,c,d,e`. Empty slots are `None`.
pub fn parse_marks(raw: &str) -> Result<[Option<i64>; MARK_COUNT], CliError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != MARK_COUNT {
        return Err(CliError::Usage(format!(
            "expected {MARK_COUNT} comma-separated marks, got {}",
            parts.len()
        )));
    }

    let mut marks = [None; MARK_COUNT];
    for (slot, part) in marks.iter_mut().zip(parts) {
        if part.is_empty() {
            continue;
        }
        *slot = Some(
            part.parse()
                .map_err(|_| CliError::Usage(format!("mark '{part}' is not an integer")))?,
        );
    }
    Ok(marks)
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn print_record(ctx: &CliContext, record: &StudentRecord) {
    if ctx.json_mode {
        print_json(&StudentJson::from(record));
        return;
    }

    let marks = record.marks().values();
    println!("Roll:       {}", record.roll());
    println!("Name:       {}", record.name());
    println!("Age:        {}", record.age());
    println!("Branch:     {}", record.branch());
    println!(
        "Marks:      {} {} {} {} {}",
        marks[0], marks[1], marks[2], marks[3], marks[4]
    );
    println!("Percentage: {}", record.percentage());
    println!("Grade:      {}", record.grade());
}

fn print_table(records: &[StudentRecord], ranked: bool) {
    let rank_header = if ranked { "Rank  " } else { "" };
    println!(
        "{rank_header}{:<6} {:<20} {:>3} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>7} {:>5}",
        "Roll", "Name", "Age", "Branch", "M1", "M2", "M3", "M4", "M5", "%", "Grade"
    );
    for (i, record) in records.iter().enumerate() {
        let rank = if ranked {
            format!("{:<4}  ", i + 1)
        } else {
            String::new()
        };
        let m = record.marks().values();
        println!(
            "{rank}{:<6} {:<20} {:>3} {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>7} {:>5}",
            record.roll().to_string(),
            record.name(),
            record.age(),
            record.branch(),
            m[0],
            m[1],
            m[2],
            m[3],
            m[4],
            record.percentage().to_string(),
            record.grade().to_string()
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_parse_with_gaps() {
        let marks = parse_marks("90, ,75,,60").expect("parse");
        assert_eq!(marks, [Some(90), None, Some(75), None, Some(60)]);
    }

    #[test]
    fn wrong_mark_count_is_rejected() {
        assert!(matches!(parse_marks("1,2,3"), Err(CliError::Usage(_))));
    }

    #[test]
    fn non_numeric_mark_is_rejected() {
        assert!(matches!(parse_marks("1,2,x,4,5"), Err(CliError::Usage(_))));
    }
}
