//! # redb-backed Atom Storage
//!
//! A disk-backed atom store using the redb embedded database.
//!
//! Every `add_node`/`add_link` call runs its signature lookup, merge or
//! allocation, and counter updates inside one write transaction. redb allows
//! a single writer at a time, so concurrent callers cannot both observe an
//! absent signature and both insert.
//!
//! ## Tables
//!
//! - `atoms`: AtomId -> postcard-encoded `Atom`
//! - `signatures`: postcard-encoded `Signature` -> AtomId
//! - `metadata`: counters (`next_atom_id`, `node_count`, `link_count`)

use crate::error::StoreError;
use crate::primitives::FIRST_ATOM_ID;
use crate::space::AtomStore;
use crate::truth::TruthValue;
use crate::types::{Atom, AtomId, AtomKind, Signature, StoreStats, TypeId};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::fmt;
use std::path::Path;

/// Table for atoms: AtomId(u64) -> serialized Atom bytes
const ATOMS: TableDefinition<u64, &[u8]> = TableDefinition::new("atoms");

/// Table for the signature index: serialized Signature bytes -> AtomId(u64)
const SIGNATURES: TableDefinition<&[u8], u64> = TableDefinition::new("signatures");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const META_NEXT_ID: &str = "next_atom_id";
const META_NODES: &str = "node_count";
const META_LINKS: &str = "link_count";

fn io_err(e: impl fmt::Display) -> StoreError {
    StoreError::IoError(e.to_string())
}

fn codec_err(e: impl fmt::Display) -> StoreError {
    StoreError::SerializationError(e.to_string())
}

/// A disk-backed atom store using redb.
pub struct RedbAtomSpace {
    db: Database,
}

impl fmt::Debug for RedbAtomSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbAtomSpace").finish_non_exhaustive()
    }
}

impl RedbAtomSpace {
    /// Open or create an atom database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        let write_txn = db.begin_write().map_err(io_err)?;
        {
            write_txn.open_table(ATOMS).map_err(io_err)?;
            write_txn.open_table(SIGNATURES).map_err(io_err)?;
            write_txn.open_table(METADATA).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        Ok(Self { db })
    }

    fn lookup(&self, signature: &Signature) -> Result<Option<AtomId>, StoreError> {
        let key = postcard::to_allocvec(signature).map_err(codec_err)?;
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SIGNATURES).map_err(io_err)?;
        let id = table
            .get(key.as_slice())
            .map_err(io_err)?
            .map(|v| AtomId(v.value()));
        Ok(id)
    }

    fn upsert(&self, signature: Signature, truth_value: TruthValue) -> Result<AtomId, StoreError> {
        let key = postcard::to_allocvec(&signature).map_err(codec_err)?;
        let kind = signature.kind();

        let write_txn = self.db.begin_write().map_err(io_err)?;
        let id = {
            let mut atoms = write_txn.open_table(ATOMS).map_err(io_err)?;
            let mut signatures = write_txn.open_table(SIGNATURES).map_err(io_err)?;
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;

            let existing = signatures
                .get(key.as_slice())
                .map_err(io_err)?
                .map(|v| v.value());

            if let Some(raw_id) = existing {
                // Merge: read-modify-write within the same transaction.
                let bytes = atoms
                    .get(raw_id)
                    .map_err(io_err)?
                    .map(|v| v.value().to_vec())
                    .ok_or_else(|| {
                        StoreError::Rejected(format!("index points at missing atom {raw_id}"))
                    })?;
                let mut atom: Atom = postcard::from_bytes(&bytes).map_err(codec_err)?;
                atom.truth_value = atom.truth_value.merge(truth_value);

                let encoded = postcard::to_allocvec(&atom).map_err(codec_err)?;
                atoms.insert(raw_id, encoded.as_slice()).map_err(io_err)?;
                tracing::debug!(id = raw_id, "merged truth value into stored atom");
                AtomId(raw_id)
            } else {
                if let Signature::Link { outgoing, .. } = &signature {
                    for target in outgoing {
                        if atoms.get(target.0).map_err(io_err)?.is_none() {
                            // Dropping the transaction aborts it.
                            return Err(StoreError::Rejected(format!(
                                "outgoing atom {target} does not exist"
                            )));
                        }
                    }
                }

                let next = meta
                    .get(META_NEXT_ID)
                    .map_err(io_err)?
                    .map(|v| v.value())
                    .unwrap_or(FIRST_ATOM_ID);
                let id = AtomId(next);
                if !id.is_valid() {
                    return Ok(AtomId::UNDEFINED);
                }

                let atom = Atom::new(id, signature, truth_value);
                let encoded = postcard::to_allocvec(&atom).map_err(codec_err)?;
                atoms.insert(next, encoded.as_slice()).map_err(io_err)?;
                signatures.insert(key.as_slice(), next).map_err(io_err)?;

                let counter = match kind {
                    AtomKind::Node => META_NODES,
                    AtomKind::Link => META_LINKS,
                };
                let count = meta
                    .get(counter)
                    .map_err(io_err)?
                    .map(|v| v.value())
                    .unwrap_or(0);
                meta.insert(counter, count.saturating_add(1)).map_err(io_err)?;
                meta.insert(META_NEXT_ID, next.saturating_add(1))
                    .map_err(io_err)?;
                tracing::debug!(id = next, %kind, "stored new atom");
                id
            }
        };
        write_txn.commit().map_err(io_err)?;

        Ok(id)
    }
}

// =============================================================================
// ATOMSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl AtomStore for RedbAtomSpace {
    fn get_node(&self, atom_type: TypeId, name: &str) -> Result<Option<AtomId>, StoreError> {
        self.lookup(&Signature::node(atom_type, name))
    }

    fn get_link(
        &self,
        atom_type: TypeId,
        outgoing: &[AtomId],
    ) -> Result<Option<AtomId>, StoreError> {
        self.lookup(&Signature::link(atom_type, outgoing))
    }

    fn add_node(
        &mut self,
        atom_type: TypeId,
        name: &str,
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.upsert(Signature::node(atom_type, name), truth_value)
    }

    fn add_link(
        &mut self,
        atom_type: TypeId,
        outgoing: &[AtomId],
        truth_value: TruthValue,
    ) -> Result<AtomId, StoreError> {
        self.upsert(Signature::link(atom_type, outgoing), truth_value)
    }

    fn get_atom(&self, id: AtomId) -> Result<Option<Atom>, StoreError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ATOMS).map_err(io_err)?;

        match table.get(id.0).map_err(io_err)? {
            Some(data) => {
                let atom: Atom = postcard::from_bytes(data.value()).map_err(codec_err)?;
                Ok(Some(atom))
            }
            None => Ok(None),
        }
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(METADATA).map_err(io_err)?;
        let read = |key: &str| -> Result<usize, StoreError> {
            Ok(table
                .get(key)
                .map_err(io_err)?
                .map(|v| v.value() as usize)
                .unwrap_or(0))
        };
        Ok(StoreStats {
            nodes: read(META_NODES)?,
            links: read(META_LINKS)?,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::truth::{Indicator, VersionedContext};
    use tempfile::tempdir;

    const CONCEPT: TypeId = TypeId(1);
    const INHERITANCE: TypeId = TypeId(11);

    fn stv(strength: f64, count: f64) -> TruthValue {
        TruthValue::Simple { strength, count }
    }

    #[test]
    fn basic_operations() {
        let temp = tempdir().expect("temp dir");
        let mut space = RedbAtomSpace::open(temp.path().join("atoms.redb")).expect("open db");

        let cat = space.add_node(CONCEPT, "cat", stv(0.9, 12.0)).expect("add");
        let animal = space.add_node(CONCEPT, "animal", stv(0.9, 12.0)).expect("add");
        let link = space
            .add_link(INHERITANCE, &[cat, animal], stv(0.8, 3.0))
            .expect("add link");

        assert_eq!(cat, AtomId(FIRST_ATOM_ID));
        assert_eq!(space.get_node(CONCEPT, "cat").expect("get"), Some(cat));
        assert_eq!(
            space.get_link(INHERITANCE, &[cat, animal]).expect("get"),
            Some(link)
        );
        assert_eq!(
            space.stats().expect("stats"),
            StoreStats { nodes: 2, links: 1 }
        );
    }

    #[test]
    fn signature_deduplication_merges() {
        let temp = tempdir().expect("temp dir");
        let mut space = RedbAtomSpace::open(temp.path().join("atoms.redb")).expect("open db");

        let first = space.add_node(CONCEPT, "cat", stv(0.2, 1.0)).expect("add");
        let second = space.add_node(CONCEPT, "cat", stv(0.9, 40.0)).expect("merge");

        assert_eq!(first, second);
        assert_eq!(space.stats().expect("stats").atoms(), 1);
        let atom = space.get_atom(first).expect("get").expect("present");
        assert_eq!(atom.truth_value, stv(0.9, 40.0));
    }

    #[test]
    fn dangling_link_is_rejected_and_rolled_back() {
        let temp = tempdir().expect("temp dir");
        let mut space = RedbAtomSpace::open(temp.path().join("atoms.redb")).expect("open db");

        let result = space.add_link(INHERITANCE, &[AtomId(77)], stv(0.5, 1.0));
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert_eq!(space.stats().expect("stats"), StoreStats::default());

        // The aborted insert must not have consumed an id.
        let id = space.add_node(CONCEPT, "a", stv(0.5, 1.0)).expect("add");
        assert_eq!(id, AtomId(FIRST_ATOM_ID));
    }

    #[test]
    fn composite_truth_value_round_trips_through_storage() {
        let temp = tempdir().expect("temp dir");
        let mut space = RedbAtomSpace::open(temp.path().join("atoms.redb")).expect("open db");

        let tv = TruthValue::Composite {
            primary: Box::new(stv(0.5, 2.0)),
            versions: vec![VersionedContext {
                indicator: Indicator::Contextual,
                context: AtomId(900),
                value: TruthValue::Indefinite {
                    lower: 0.1,
                    upper: 0.4,
                    confidence: 0.7,
                },
            }],
        };
        let id = space.add_node(CONCEPT, "ctx", tv.clone()).expect("add");
        let atom = space.get_atom(id).expect("get").expect("present");
        assert_eq!(atom.truth_value, tv);
    }

    #[test]
    fn recovery_persistence_after_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("atoms.redb");

        let cat = {
            let mut space = RedbAtomSpace::open(&db_path).expect("open db");
            space.add_node(CONCEPT, "cat", stv(0.9, 12.0)).expect("add")
        };

        let mut space = RedbAtomSpace::open(&db_path).expect("reopen db");
        assert_eq!(space.get_node(CONCEPT, "cat").expect("get"), Some(cat));

        // Identifier allocation resumes after the last stored atom.
        let dog = space.add_node(CONCEPT, "dog", stv(0.9, 12.0)).expect("add");
        assert!(dog > cat);
        assert_eq!(space.stats().expect("stats").nodes, 2);
    }

    #[test]
    fn missing_atom_is_none() {
        let temp = tempdir().expect("temp dir");
        let space = RedbAtomSpace::open(temp.path().join("atoms.redb")).expect("open db");
        assert!(space.get_atom(AtomId(5)).expect("get").is_none());
    }
}
