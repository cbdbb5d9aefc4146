//! SQLite storage backend for built graphs

use super::traits::{GraphStore, OpenStore, StorageError, StorageResult};
use crate::graph::{
    CausalEdge, CausalGraph, Entity, EntityId, EvidenceItem, GraphMetadata, SignificanceRecord,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// SQLite-backed graph store
///
/// One database file holds any number of named graphs. Saving a graph
/// replaces every row stored under its name inside a single transaction,
/// so readers see either the previous artifact or the new one.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Column tuple of one `edges` row, minus the graph name and position
type EdgeRow = (
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    String,
    String,
    String,
);

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS graphs (
                name TEXT PRIMARY KEY,
                metadata_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS nodes (
                graph TEXT NOT NULL,
                id TEXT NOT NULL,
                label TEXT NOT NULL,
                PRIMARY KEY (graph, id),
                FOREIGN KEY (graph) REFERENCES graphs(name) ON DELETE CASCADE
            );

            -- Multigraph: edges are keyed by insertion position
            CREATE TABLE IF NOT EXISTS edges (
                graph TEXT NOT NULL,
                position INTEGER NOT NULL,
                controller TEXT NOT NULL,
                input TEXT NOT NULL,
                output TEXT NOT NULL,
                trigger TEXT NOT NULL,
                label TEXT NOT NULL,
                freq INTEGER NOT NULL,
                evidence_json TEXT NOT NULL,
                seen_in_json TEXT NOT NULL,
                journals_json TEXT NOT NULL,
                impact_factors_json TEXT NOT NULL,
                PRIMARY KEY (graph, position),
                FOREIGN KEY (graph) REFERENCES graphs(name) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_edges_controller
                ON edges(graph, controller);
            CREATE INDEX IF NOT EXISTS idx_edges_output
                ON edges(graph, output);

            CREATE TABLE IF NOT EXISTS significance (
                graph TEXT NOT NULL,
                document TEXT NOT NULL,
                position INTEGER NOT NULL,
                kind TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (graph, document, position),
                FOREIGN KEY (graph) REFERENCES graphs(name) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS synonyms (
                graph TEXT NOT NULL,
                id TEXT NOT NULL,
                synonyms_json TEXT NOT NULL,
                PRIMARY KEY (graph, id),
                FOREIGN KEY (graph) REFERENCES graphs(name) ON DELETE CASCADE
            );

            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn edge_to_row(edge: &CausalEdge) -> StorageResult<EdgeRow> {
        Ok((
            edge.controller.to_string(),
            edge.input.to_string(),
            edge.output.to_string(),
            edge.trigger.clone(),
            edge.label.clone(),
            edge.freq as i64,
            serde_json::to_string(&edge.evidence)?,
            serde_json::to_string(&edge.seen_in)?,
            serde_json::to_string(&edge.journals)?,
            serde_json::to_string(&edge.impact_factors)?,
        ))
    }

    fn row_to_edge(row: EdgeRow) -> StorageResult<CausalEdge> {
        let (
            controller,
            input,
            output,
            trigger,
            label,
            freq,
            evidence_json,
            seen_in_json,
            journals_json,
            impact_factors_json,
        ) = row;

        let evidence: Vec<EvidenceItem> = serde_json::from_str(&evidence_json)?;
        Ok(CausalEdge {
            controller: EntityId::from(controller),
            input: EntityId::from(input),
            output: EntityId::from(output),
            trigger,
            label,
            freq: freq.max(0) as u64,
            evidence,
            seen_in: serde_json::from_str(&seen_in_json)?,
            journals: serde_json::from_str(&journals_json)?,
            impact_factors: serde_json::from_str(&impact_factors_json)?,
        })
    }

    fn write_graph(tx: &Transaction<'_>, name: &str, graph: &CausalGraph) -> StorageResult<()> {
        // Cascades to every table keyed by graph name
        tx.execute("DELETE FROM graphs WHERE name = ?1", params![name])?;
        tx.execute(
            "INSERT INTO graphs (name, metadata_json) VALUES (?1, ?2)",
            params![name, serde_json::to_string(&graph.metadata)?],
        )?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO nodes (graph, id, label) VALUES (?1, ?2, ?3)")?;
            for node in graph.nodes.values() {
                stmt.execute(params![name, node.id.as_str(), node.label])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO edges (graph, position, controller, input, output, trigger, label, freq, evidence_json, seen_in_json, journals_json, impact_factors_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for (position, edge) in graph.edges.iter().enumerate() {
                let row = Self::edge_to_row(edge)?;
                stmt.execute(params![
                    name,
                    position as i64,
                    row.0,
                    row.1,
                    row.2,
                    row.3,
                    row.4,
                    row.5,
                    row.6,
                    row.7,
                    row.8,
                    row.9,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO significance (graph, document, position, kind, value) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (document, records) in &graph.significance {
                for (position, record) in records.iter().enumerate() {
                    stmt.execute(params![
                        name,
                        document,
                        position as i64,
                        record.kind,
                        record.value
                    ])?;
                }
            }
        }

        {
            let mut stmt =
                tx.prepare("INSERT INTO synonyms (graph, id, synonyms_json) VALUES (?1, ?2, ?3)")?;
            for (id, synonyms) in &graph.synonyms {
                stmt.execute(params![name, id.as_str(), serde_json::to_string(synonyms)?])?;
            }
        }

        Ok(())
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    fn save_graph(&self, name: &str, graph: &CausalGraph) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::write_graph(&tx, name, graph)?;
        tx.commit()?;

        debug!(
            graph = name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "saved graph"
        );
        Ok(())
    }

    fn load_graph(&self, name: &str) -> StorageResult<Option<CausalGraph>> {
        let conn = self.lock()?;

        let metadata_json: Option<String> = conn
            .query_row(
                "SELECT metadata_json FROM graphs WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(metadata_json) = metadata_json else {
            return Ok(None);
        };

        let mut graph = CausalGraph::new();
        graph.metadata = serde_json::from_str::<GraphMetadata>(&metadata_json)?;

        let mut stmt = conn.prepare("SELECT id, label FROM nodes WHERE graph = ?1")?;
        let nodes = stmt.query_map(params![name], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for node in nodes {
            let (id, label) = node?;
            let id = EntityId::from(id);
            graph.nodes.insert(id.clone(), Entity::new(id, label));
        }

        let mut stmt = conn.prepare(
            "SELECT controller, input, output, trigger, label, freq, evidence_json, seen_in_json, journals_json, impact_factors_json
             FROM edges WHERE graph = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![name], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
            ))
        })?;
        for row in rows {
            graph.edges.push(Self::row_to_edge(row?)?);
        }

        let mut stmt = conn.prepare(
            "SELECT document, kind, value FROM significance WHERE graph = ?1 ORDER BY document, position",
        )?;
        let records = stmt.query_map(params![name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for record in records {
            let (document, kind, value) = record?;
            graph
                .significance
                .entry(document)
                .or_default()
                .push(SignificanceRecord::new(kind, value));
        }

        let mut stmt = conn.prepare("SELECT id, synonyms_json FROM synonyms WHERE graph = ?1")?;
        let synonyms = stmt.query_map(params![name], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for entry in synonyms {
            let (id, json) = entry?;
            graph
                .synonyms
                .insert(EntityId::from(id), serde_json::from_str(&json)?);
        }

        Ok(Some(graph))
    }

    fn delete_graph(&self, name: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM graphs WHERE name = ?1", params![name])?;
        Ok(rows > 0)
    }

    fn list_graphs(&self) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM graphs ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}
