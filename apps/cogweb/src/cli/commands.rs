//! # CLI Command Implementations

use crate::api::{self, AppState, AtomResponse, TypesResponse};
use crate::config::{CogwebError, validate_file_path};
use crate::store::{BackendKind, StoreBackend};
use cogweb_core::{AtomId, AtomStore, ClassServer, create_atom, response};
use std::path::PathBuf;

/// Flags shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub database: PathBuf,
    pub backend: BackendKind,
    pub json_mode: bool,
}

impl CommandContext {
    fn open_store(&self) -> Result<StoreBackend, CogwebError> {
        StoreBackend::open(self.backend, &self.database)
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    ctx: &CommandContext,
    registry: ClassServer,
    host: &str,
    port: u16,
) -> Result<(), CogwebError> {
    let store = ctx.open_store()?;

    println!("cogweb Atom Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", ctx.backend);
    println!("  Database: {:?}", ctx.database);
    println!("  Types:    {}", registry.len());
    println!();
    println!("Endpoints:");
    println!("  POST /atom          - Create or merge an atom");
    println!("  GET  /atom/{{handle}} - Fetch an atom");
    println!("  GET  /types         - List atom types");
    println!("  GET  /status        - Atom counts");
    println!("  GET  /health        - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, AppState::new(store, registry)).await
}

// =============================================================================
// CREATE COMMAND
// =============================================================================

/// Create or merge the atom described by a request file.
pub fn cmd_create(
    ctx: &CommandContext,
    registry: &ClassServer,
    file: &std::path::Path,
) -> Result<(), CogwebError> {
    let path = validate_file_path(file)?;
    let body = std::fs::read_to_string(&path)
        .map_err(|e| CogwebError::Io(format!("Read request file: {e}")))?;

    let mut store = ctx.open_store()?;
    let outcome = create_atom(&body, registry, &mut store);

    if ctx.json_mode {
        print_json(&response::encode(&outcome));
    }

    let built = outcome?;
    if !ctx.json_mode {
        let verb = if built.existed { "Merged into" } else { "Created" };
        println!("{} atom {}", verb, built.handle);
    }
    Ok(())
}

// =============================================================================
// GET COMMAND
// =============================================================================

/// Show a stored atom.
pub fn cmd_get(
    ctx: &CommandContext,
    registry: &ClassServer,
    handle: u64,
) -> Result<(), CogwebError> {
    let store = ctx.open_store()?;
    let Some(atom) = store.get_atom(AtomId(handle))? else {
        return Err(CogwebError::Io(format!("atom {handle} not found")));
    };
    let atom = AtomResponse::from_atom(&atom, registry);

    if ctx.json_mode {
        print_json(&atom);
        return Ok(());
    }

    println!("Atom {}", atom.handle);
    println!("==========");
    println!("Type:       {} ({})", atom.type_name, atom.kind);
    if let Some(name) = &atom.name {
        println!("Name:       {}", name);
    }
    if let Some(outgoing) = &atom.outgoing {
        println!("Outgoing:   {:?}", outgoing);
    }
    println!("Truth:      {}", atom.truthvalue);
    println!("Mean:       {:.4}", atom.mean);
    println!("Confidence: {:.4}", atom.confidence);
    Ok(())
}

// =============================================================================
// TYPES COMMAND
// =============================================================================

/// List registered atom types.
pub fn cmd_types(ctx: &CommandContext, registry: &ClassServer) -> Result<(), CogwebError> {
    let listing = TypesResponse::from(registry);

    if ctx.json_mode {
        print_json(&listing);
        return Ok(());
    }

    println!("Atom Types ({})", listing.types.len());
    println!("==========");
    for ty in &listing.types {
        println!("{:>4}  {:<5}  {}", ty.id, ty.kind.as_str(), ty.name);
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show atom counts.
pub fn cmd_status(ctx: &CommandContext) -> Result<(), CogwebError> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "backend": ctx.backend.to_string(),
            "atom_count": stats.atoms(),
            "node_count": stats.nodes,
            "link_count": stats.links,
        }));
        return Ok(());
    }

    println!("cogweb Atom Store Status");
    println!("========================");
    println!("Database: {:?}", ctx.database);
    println!("Backend:  {}", ctx.backend);
    println!();
    println!("Atoms: {}", stats.atoms());
    println!("Nodes: {}", stats.nodes);
    println!("Links: {}", stats.links);
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database file.
pub fn cmd_init(ctx: &CommandContext, force: bool) -> Result<(), CogwebError> {
    if ctx.backend == BackendKind::Memory {
        return Err(CogwebError::Config(
            "the memory backend has no database to initialize".to_string(),
        ));
    }

    if ctx.database.exists() {
        if !force {
            return Err(CogwebError::Io(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(&ctx.database)
            .map_err(|e| CogwebError::Io(format!("Remove existing database: {e}")))?;
    }

    ctx.open_store()?;
    println!("Initialized new redb database at {:?}", ctx.database);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str =
        r#"{"type":"ConceptNode","name":"cat","truthvalue":{"simple":{"str":0.9,"count":12}}}"#;

    fn redb_ctx(dir: &tempfile::TempDir) -> CommandContext {
        CommandContext {
            database: dir.path().join("atoms.redb"),
            backend: BackendKind::Redb,
            json_mode: true,
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = redb_ctx(&dir);

        cmd_init(&ctx, false).expect("first init");
        assert!(cmd_init(&ctx, false).is_err());
        cmd_init(&ctx, true).expect("forced init");
    }

    #[test]
    fn forced_init_clears_atoms() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = redb_ctx(&dir);
        let request = dir.path().join("request.json");
        std::fs::write(&request, BODY).expect("write");

        cmd_create(&ctx, &ClassServer::new(), &request).expect("create");
        cmd_init(&ctx, true).expect("forced init");

        let store = ctx.open_store().expect("open");
        assert_eq!(store.stats().expect("stats").atoms(), 0);
    }

    #[test]
    fn create_then_get() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = redb_ctx(&dir);
        let registry = ClassServer::new();
        let request = dir.path().join("request.json");
        std::fs::write(&request, BODY).expect("write");

        cmd_create(&ctx, &registry, &request).expect("create");
        cmd_create(&ctx, &registry, &request).expect("merge");
        cmd_get(&ctx, &registry, 1).expect("get");
        assert!(cmd_get(&ctx, &registry, 2).is_err());

        let store = ctx.open_store().expect("open");
        assert_eq!(store.stats().expect("stats").nodes, 1);
    }

    #[test]
    fn rejected_request_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = redb_ctx(&dir);
        let request = dir.path().join("request.json");
        std::fs::write(&request, r#"{"type":"ConceptNode","name":"cat"}"#).expect("write");

        let err = cmd_create(&ctx, &ClassServer::new(), &request).expect_err("no tv");
        assert_eq!(err.to_string(), "request rejected: no truthvalue");
    }

    #[test]
    fn init_needs_a_database_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = CommandContext {
            backend: BackendKind::Memory,
            ..redb_ctx(&dir)
        };
        assert!(matches!(cmd_init(&ctx, false), Err(CogwebError::Config(_))));
    }
}
