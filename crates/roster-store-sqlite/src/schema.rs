//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS agents (
    agent_id       TEXT PRIMARY KEY,
    agency_name    TEXT NOT NULL,
    slug           TEXT NOT NULL UNIQUE,
    public_listing INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    player_id       TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    owner_agent_id  TEXT REFERENCES agents(agent_id),
    positions       TEXT NOT NULL DEFAULT '[]',   -- JSON array of labels
    birth_date      TEXT,                         -- raw, may be malformed
    contract_status TEXT NOT NULL,                -- 'free' | 'loaned' | 'contracted'
    created_at      TEXT NOT NULL
);

-- Applications are never deleted. The only UPDATE ever issued is the
-- pending -> terminal compare-and-set.
CREATE TABLE IF NOT EXISTS applications (
    application_id TEXT PRIMARY KEY,
    player_id      TEXT NOT NULL REFERENCES players(player_id),
    agent_id       TEXT NOT NULL REFERENCES agents(agent_id),
    status         TEXT NOT NULL DEFAULT 'pending'
                   CHECK (status IN ('pending', 'accepted', 'rejected')),
    message        TEXT,
    created_at     TEXT NOT NULL,
    resolved_at    TEXT
);

-- At most one pending application per (player, agent) pair.
CREATE UNIQUE INDEX IF NOT EXISTS applications_one_pending
    ON applications(player_id, agent_id) WHERE status = 'pending';

CREATE INDEX IF NOT EXISTS applications_player_idx ON applications(player_id);
CREATE INDEX IF NOT EXISTS applications_agent_idx  ON applications(agent_id);
CREATE INDEX IF NOT EXISTS players_owner_idx       ON players(owner_agent_id);

PRAGMA user_version = 1;
";
