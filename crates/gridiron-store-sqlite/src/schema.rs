//! SQL schema for the Gridiron SQLite store.
//!
//! Executed once when the pool opens. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Per-connection settings; applied to every pooled connection.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
";

/// Full schema DDL plus the fixed enumerations the pipeline relies on;
/// idempotent thanks to `IF NOT EXISTS` and `INSERT OR IGNORE`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS rating_iteration (
    iteration_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    iteration_name    TEXT    NOT NULL UNIQUE,
    iteration_date    TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    season_year       INTEGER NOT NULL,
    week_number       INTEGER NOT NULL,
    is_regular_season INTEGER NOT NULL DEFAULT 1
);

-- ── Measured dimensions: created on first sight ─────────────────────────────

CREATE TABLE IF NOT EXISTS player_height (
    height_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    height_inches  INTEGER NOT NULL UNIQUE,
    display_height TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS player_weight (
    weight_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    weight_lbs     INTEGER NOT NULL UNIQUE,
    display_weight TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS player_age (
    age_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    age_years   INTEGER NOT NULL UNIQUE,
    display_age TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS jersey_number (
    jersey_number_id INTEGER PRIMARY KEY AUTOINCREMENT,
    number           INTEGER NOT NULL UNIQUE,
    display_number   TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS years_pro (
    years_pro_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    years         INTEGER NOT NULL UNIQUE,
    display_years TEXT    NOT NULL
);

-- ── Labelled dimensions: seeded externally ──────────────────────────────────

CREATE TABLE IF NOT EXISTS handedness (
    handedness_id INTEGER PRIMARY KEY AUTOINCREMENT,
    handedness    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS position (
    position_id INTEGER PRIMARY KEY AUTOINCREMENT,
    position    TEXT NOT NULL UNIQUE     -- short code, e.g. 'HB'
);

CREATE TABLE IF NOT EXISTS team (
    team_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    team_label TEXT NOT NULL UNIQUE      -- full name, e.g. 'Kansas City Chiefs'
);

CREATE TABLE IF NOT EXISTS college (
    college_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    college_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS archetype (
    archetype_id INTEGER PRIMARY KEY AUTOINCREMENT,
    archetype    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS ability (
    ability_id INTEGER PRIMARY KEY AUTOINCREMENT,
    ability    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS running_style (
    style_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    style_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS development_trait (
    development_trait_id INTEGER PRIMARY KEY AUTOINCREMENT,
    trait_name           TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS draft_pick (
    pick_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    round_number  INTEGER NOT NULL,
    pick_in_round INTEGER NOT NULL,
    overall_pick  INTEGER NOT NULL UNIQUE,
    display_pick  TEXT    NOT NULL
);

-- ── Players ──────────────────────────────────────────────────────────────────

-- Current attributes; upserted every run, last write wins.
CREATE TABLE IF NOT EXISTS player (
    player_id        INTEGER PRIMARY KEY,   -- provider identity
    first_name       TEXT    NOT NULL,
    last_name        TEXT    NOT NULL,
    height_id        INTEGER NOT NULL REFERENCES player_height(height_id),
    weight_id        INTEGER NOT NULL REFERENCES player_weight(weight_id),
    age_id           INTEGER NOT NULL REFERENCES player_age(age_id),
    college_id       INTEGER          REFERENCES college(college_id),
    handedness_id    INTEGER NOT NULL REFERENCES handedness(handedness_id),
    jersey_number_id INTEGER NOT NULL REFERENCES jersey_number(jersey_number_id),
    years_pro_id     INTEGER NOT NULL REFERENCES years_pro(years_pro_id),
    position_id      INTEGER NOT NULL REFERENCES position(position_id),
    team_id          INTEGER NOT NULL REFERENCES team(team_id)
);

-- One row per player per iteration. Only development_trait_id is ever
-- updated after insert.
CREATE TABLE IF NOT EXISTS player_rating (
    player_id            INTEGER NOT NULL REFERENCES player(player_id),
    iteration_id         INTEGER NOT NULL REFERENCES rating_iteration(iteration_id),
    development_trait_id INTEGER NOT NULL REFERENCES development_trait(development_trait_id),
    style_id             INTEGER NOT NULL REFERENCES running_style(style_id),
    overall                INTEGER NOT NULL DEFAULT 0,
    acceleration           INTEGER NOT NULL DEFAULT 0,
    agility                INTEGER NOT NULL DEFAULT 0,
    jumping                INTEGER NOT NULL DEFAULT 0,
    stamina                INTEGER NOT NULL DEFAULT 0,
    strength               INTEGER NOT NULL DEFAULT 0,
    awareness              INTEGER NOT NULL DEFAULT 0,
    bcvision               INTEGER NOT NULL DEFAULT 0,
    block_shedding         INTEGER NOT NULL DEFAULT 0,
    break_sack             INTEGER NOT NULL DEFAULT 0,
    break_tackle           INTEGER NOT NULL DEFAULT 0,
    carrying               INTEGER NOT NULL DEFAULT 0,
    catch_in_traffic       INTEGER NOT NULL DEFAULT 0,
    catching               INTEGER NOT NULL DEFAULT 0,
    change_of_direction    INTEGER NOT NULL DEFAULT 0,
    deep_route_running     INTEGER NOT NULL DEFAULT 0,
    finesse_moves          INTEGER NOT NULL DEFAULT 0,
    hit_power              INTEGER NOT NULL DEFAULT 0,
    impact_blocking        INTEGER NOT NULL DEFAULT 0,
    injury                 INTEGER NOT NULL DEFAULT 0,
    juke_move              INTEGER NOT NULL DEFAULT 0,
    kick_accuracy          INTEGER NOT NULL DEFAULT 0,
    kick_power             INTEGER NOT NULL DEFAULT 0,
    kick_return            INTEGER NOT NULL DEFAULT 0,
    lead_block             INTEGER NOT NULL DEFAULT 0,
    man_coverage           INTEGER NOT NULL DEFAULT 0,
    medium_route_running   INTEGER NOT NULL DEFAULT 0,
    pass_block             INTEGER NOT NULL DEFAULT 0,
    pass_block_finesse     INTEGER NOT NULL DEFAULT 0,
    pass_block_power       INTEGER NOT NULL DEFAULT 0,
    play_action            INTEGER NOT NULL DEFAULT 0,
    play_recognition       INTEGER NOT NULL DEFAULT 0,
    power_moves            INTEGER NOT NULL DEFAULT 0,
    press                  INTEGER NOT NULL DEFAULT 0,
    pursuit                INTEGER NOT NULL DEFAULT 0,
    release                INTEGER NOT NULL DEFAULT 0,
    run_block              INTEGER NOT NULL DEFAULT 0,
    run_block_finesse      INTEGER NOT NULL DEFAULT 0,
    run_block_power        INTEGER NOT NULL DEFAULT 0,
    short_route_running    INTEGER NOT NULL DEFAULT 0,
    spectacular_catch      INTEGER NOT NULL DEFAULT 0,
    speed                  INTEGER NOT NULL DEFAULT 0,
    spin_move              INTEGER NOT NULL DEFAULT 0,
    stiff_arm              INTEGER NOT NULL DEFAULT 0,
    tackle                 INTEGER NOT NULL DEFAULT 0,
    throw_accuracy_deep    INTEGER NOT NULL DEFAULT 0,
    throw_accuracy_mid     INTEGER NOT NULL DEFAULT 0,
    throw_accuracy_short   INTEGER NOT NULL DEFAULT 0,
    throw_on_the_run       INTEGER NOT NULL DEFAULT 0,
    throw_power            INTEGER NOT NULL DEFAULT 0,
    throw_under_pressure   INTEGER NOT NULL DEFAULT 0,
    toughness              INTEGER NOT NULL DEFAULT 0,
    trucking               INTEGER NOT NULL DEFAULT 0,
    zone_coverage          INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (player_id, iteration_id)
);

CREATE TABLE IF NOT EXISTS player_ability (
    player_id    INTEGER NOT NULL REFERENCES player(player_id),
    ability_id   INTEGER NOT NULL REFERENCES ability(ability_id),
    iteration_id INTEGER NOT NULL REFERENCES rating_iteration(iteration_id),
    PRIMARY KEY (player_id, iteration_id, ability_id)
);

CREATE TABLE IF NOT EXISTS player_archetype (
    player_id    INTEGER NOT NULL REFERENCES player(player_id),
    archetype_id INTEGER NOT NULL REFERENCES archetype(archetype_id),
    iteration_id INTEGER NOT NULL REFERENCES rating_iteration(iteration_id),
    PRIMARY KEY (player_id, iteration_id)
);

-- Write-once: never updated or deleted.
CREATE TABLE IF NOT EXISTS draft_data (
    draft_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL UNIQUE REFERENCES player(player_id),
    pick_id   INTEGER NOT NULL REFERENCES draft_pick(pick_id)
);

CREATE INDEX IF NOT EXISTS iteration_date_idx ON rating_iteration(iteration_date);
CREATE INDEX IF NOT EXISTS rating_iteration_idx ON player_rating(iteration_id);

-- ── Fixed enumerations ───────────────────────────────────────────────────────

INSERT OR IGNORE INTO handedness (handedness) VALUES ('Right'), ('Left');

INSERT OR IGNORE INTO development_trait (development_trait_id, trait_name) VALUES
    (1, 'Normal'),
    (2, 'Star'),
    (3, 'Superstar'),
    (4, 'X-Factor');

INSERT OR IGNORE INTO running_style (style_name) VALUES
    ('None'),
    ('Long Stride Loose'),
    ('Default'),
    ('Long Stride High and Tight'),
    ('Default Stride Awkward'),
    ('Short Stride Bread Loaf'),
    ('Default Stride Loose'),
    ('Short Stride Default'),
    ('Long Stride Default'),
    ('Default Stride High and Tight'),
    ('Short Stride High and Tight'),
    ('Short Stride Loose'),
    ('Long Stride Awkward'),
    ('Short Stride Awkward'),
    ('Long Stride Bread Loaf'),
    ('Default Stride Bread Loaf');

INSERT OR IGNORE INTO archetype (archetype) VALUES ('None');

-- 54 rounds x 32 picks.
WITH RECURSIVE pick(overall) AS (
    SELECT 1
    UNION ALL
    SELECT overall + 1 FROM pick WHERE overall < 1728
)
INSERT OR IGNORE INTO draft_pick (round_number, pick_in_round, overall_pick, display_pick)
SELECT (overall - 1) / 32 + 1,
       (overall - 1) % 32 + 1,
       overall,
       'Round ' || ((overall - 1) / 32 + 1) || ', Pick ' || ((overall - 1) % 32 + 1)
           || ' (' || overall || ' overall)'
FROM pick;

PRAGMA user_version = 1;
";
