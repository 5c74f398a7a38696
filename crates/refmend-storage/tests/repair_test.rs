//! Orphaned profile reference repair against real SQLite.
//!
//! Most cases seed a database at v001 and then run the remaining
//! migrations, so the repair runs exactly as it does during an upgrade.

use refmend_core::errors::{RefmendError, RepairError};
use refmend_core::{RefmendConfig, RefmendErrorCode, ReferenceLink, ResolutionBasis};
use refmend_storage::{migrations, repair, DatabaseManager};
use rusqlite::{params, Connection};

#[test]
fn movie_with_valid_profile_is_unchanged() {
    let conn = migrated_with(|c| {
        add_profile(c, 2, "My Custom Profile");
        add_movie(c, 123456, Some(2));
    });

    assert_eq!(movie_profiles(&conn), vec![Some(2)]);
}

#[test]
fn movie_with_bad_profile_moves_to_only_profile() {
    let conn = migrated_with(|c| {
        add_profile(c, 2, "My Custom Profile");
        add_movie(c, 123456, Some(1));
    });

    assert_eq!(movie_profiles(&conn), vec![Some(2)]);
}

#[test]
fn orphans_move_to_most_common_valid_profile() {
    let conn = migrated_with(|c| {
        add_profile(c, 2, "My Custom Profile");
        add_profile(c, 3, "My Custom Profile 2");
        for tmdb in 123451..=123454 {
            add_movie(c, tmdb, Some(1));
        }
        for tmdb in 123455..=123457 {
            add_movie(c, tmdb, Some(2));
        }
        for tmdb in 123458..=123459 {
            add_movie(c, tmdb, Some(3));
        }
    });

    let profiles = movie_profiles(&conn);
    assert_eq!(profiles.len(), 9);
    assert_eq!(profiles.iter().filter(|p| **p == Some(2)).count(), 7);
    assert_eq!(profiles.iter().filter(|p| **p == Some(3)).count(), 2);
    // The originally valid rows kept their profile.
    assert_eq!(&profiles[4..], &[Some(2), Some(2), Some(2), Some(3), Some(3)]);
}

#[test]
fn null_profile_is_treated_as_orphan() {
    let conn = migrated_with(|c| {
        add_profile(c, 4, "Any");
        add_movie(c, 1, None);
        add_movie(c, 2, Some(4));
    });

    assert_eq!(movie_profiles(&conn), vec![Some(4), Some(4)]);
}

#[test]
fn fallback_uses_lowest_profile_id() {
    let conn = migrated_with(|c| {
        add_profile(c, 9, "Late");
        add_profile(c, 5, "Early");
        add_movie(c, 1, Some(1));
        add_movie(c, 2, Some(7));
    });

    assert_eq!(movie_profiles(&conn), vec![Some(5), Some(5)]);
}

#[test]
fn equal_counts_prefer_profile_seen_first() {
    let conn = migrated_with(|c| {
        add_profile(c, 2, "Two");
        add_profile(c, 3, "Three");
        add_movie(c, 10, Some(3));
        add_movie(c, 11, Some(2));
        add_movie(c, 12, Some(1));
        add_movie(c, 13, Some(2));
        add_movie(c, 14, Some(3));
    });

    assert_eq!(movie_profiles(&conn)[2], Some(3));
}

#[test]
fn import_lists_are_repaired_independently() {
    let conn = migrated_with(|c| {
        add_profile(c, 2, "Two");
        add_profile(c, 3, "Three");
        add_movie(c, 1, Some(2));
        add_movie(c, 2, Some(2));
        add_list(c, 1, Some(3));
        add_list(c, 2, Some(8));
    });

    assert_eq!(movie_profiles(&conn), vec![Some(2), Some(2)]);
    assert_eq!(list_profiles(&conn), vec![Some(3), Some(3)]);
}

#[test]
fn empty_profile_table_fails_without_mutation() {
    let conn = Connection::open_in_memory().unwrap();
    let config = RefmendConfig::default();
    migrations::run_migrations_to(&conn, &config, 1).unwrap();
    add_movie(&conn, 1, Some(1));

    assert!(migrations::run_migrations(&conn, &config).is_err());
    assert_eq!(movie_profiles(&conn), vec![Some(1)]);
}

#[test]
fn repair_twice_changes_nothing_the_second_time() {
    let db = DatabaseManager::open_in_memory(RefmendConfig::default()).unwrap();
    db.with_conn(|c| {
        add_profile(c, 2, "Two");
        add_movie(c, 1, Some(1));
        add_movie(c, 2, Some(2));
        add_list(c, 1, Some(6));
        Ok(())
    })
    .unwrap();

    let first = db.repair_references().unwrap();
    assert_eq!(first.total_rows_updated(), 2);
    let after_first = db.with_conn(|c| Ok((movie_profiles(c), list_profiles(c)))).unwrap();

    let second = db.repair_references().unwrap();
    assert_eq!(second.total_orphans(), 0);
    assert_eq!(second.total_rows_updated(), 0);
    let after_second = db.with_conn(|c| Ok((movie_profiles(c), list_profiles(c)))).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn single_valid_row_reports_no_work() {
    let db = DatabaseManager::open_in_memory(RefmendConfig::default()).unwrap();
    db.with_conn(|c| {
        add_profile(c, 2, "Two");
        add_movie(c, 1, Some(2));
        c.execute_batch(
            "
            CREATE TABLE movie_updates (movie_id INTEGER);
            CREATE TRIGGER record_movie_update AFTER UPDATE ON movies
            BEGIN
                INSERT INTO movie_updates VALUES (NEW.id);
            END;
            ",
        )
        .unwrap();
        Ok(())
    })
    .unwrap();

    let report = db.repair_references().unwrap();
    let movies = report.for_child_table("movies").unwrap();
    assert_eq!(movies.orphan_count, 0);
    assert_eq!(movies.rows_updated, 0);
    assert!(movies.resolution.is_none());

    let updates: i64 = db
        .with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM movie_updates", [], |row| row.get(0)).unwrap()))
        .unwrap();
    assert_eq!(updates, 0, "no UPDATE may touch movies");
    assert_eq!(db.with_conn(|c| Ok(movie_profiles(c))).unwrap(), vec![Some(2)]);
}

#[test]
fn transactional_repair_rolls_back_on_empty_parent_set() {
    let db = DatabaseManager::open_in_memory(RefmendConfig::default()).unwrap();
    db.with_conn(|c| {
        add_movie(c, 1, Some(1));
        Ok(())
    })
    .unwrap();

    let err = db.repair_references().unwrap_err();
    assert!(matches!(
        err,
        RefmendError::Repair(RepairError::EmptyParentSet { ref parent_table }) if parent_table == "profiles"
    ));
    assert_eq!(err.error_code(), "EMPTY_PARENT_SET");
    assert_eq!(db.with_conn(|c| Ok(movie_profiles(c))).unwrap(), vec![Some(1)]);
    // The connection is usable again after the rollback.
    db.with_conn(|c| {
        add_profile(c, 3, "Three");
        Ok(())
    })
    .unwrap();
    assert_eq!(db.repair_references().unwrap().total_rows_updated(), 1);
}

#[test]
fn plan_reports_without_writing() {
    let db = DatabaseManager::open_in_memory(RefmendConfig::default()).unwrap();
    db.with_conn(|c| {
        add_profile(c, 2, "Two");
        add_movie(c, 1, Some(1));
        add_movie(c, 2, Some(1));
        Ok(())
    })
    .unwrap();

    let plan = db.plan_repair().unwrap();
    assert!(!plan.applied);
    let movies = plan.for_child_table("movies").unwrap();
    assert_eq!(movies.orphan_count, 2);
    let resolution = movies.resolution.unwrap();
    assert_eq!(resolution.parent_id, 2);
    assert_eq!(resolution.basis, ResolutionBasis::Fallback);
    assert_eq!(db.with_conn(|c| Ok(movie_profiles(c))).unwrap(), vec![Some(1), Some(1)]);

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["links"][0]["resolution"]["basis"]["kind"], "fallback");
}

#[test]
fn custom_link_with_non_default_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        CREATE TABLE tiers (tier_key INTEGER PRIMARY KEY, label TEXT);
        CREATE TABLE accounts (account_no INTEGER PRIMARY KEY, tier INTEGER);
        INSERT INTO tiers VALUES (10, 'gold'), (20, 'silver');
        INSERT INTO accounts VALUES (1, 20), (2, 20), (3, 10), (4, 99), (5, NULL);
        ",
    )
    .unwrap();
    let link = ReferenceLink {
        child_table: "accounts".to_string(),
        child_id_column: "account_no".to_string(),
        reference_column: "tier".to_string(),
        parent_table: "tiers".to_string(),
        parent_id_column: "tier_key".to_string(),
    };

    let report = repair::repair(&conn, std::slice::from_ref(&link)).unwrap();
    assert_eq!(report.links[0].orphan_count, 2);
    assert_eq!(report.links[0].rows_updated, 2);
    assert_eq!(report.links[0].remaining_orphans, 0);

    let tiers: Vec<Option<i64>> = conn
        .prepare("SELECT tier FROM accounts ORDER BY account_no")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tiers, vec![Some(20), Some(20), Some(10), Some(20), Some(20)]);
}

#[test]
fn missing_child_table_fails_but_other_links_run() {
    let conn = Connection::open_in_memory().unwrap();
    migrations::run_migrations_to(&conn, &RefmendConfig::default(), 1).unwrap();
    add_profile(&conn, 2, "Two");
    add_list(&conn, 1, Some(5));

    let links = vec![
        ReferenceLink::new("episodes", "profile_id", "profiles"),
        ReferenceLink::new("import_lists", "profile_id", "profiles"),
    ];
    let err = repair::repair(&conn, &links).unwrap_err();
    match err {
        RepairError::LinksFailed { failures } => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].contains("episodes"));
        }
        other => panic!("expected LinksFailed, got {other:?}"),
    }
    assert_eq!(list_profiles(&conn), vec![Some(2)]);
}

// ---- Helpers ----

/// Migrate to v001, seed with `seed`, then run the remaining migrations.
fn migrated_with(seed: impl FnOnce(&Connection)) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    let config = RefmendConfig::default();
    migrations::run_migrations_to(&conn, &config, 1).unwrap();
    seed(&conn);
    migrations::run_migrations(&conn, &config).unwrap();
    conn
}

fn add_profile(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO profiles (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .unwrap();
}

fn add_movie(conn: &Connection, tmdb_id: i64, profile_id: Option<i64>) {
    conn.execute(
        "INSERT INTO movies (id, title, tmdb_id, profile_id) VALUES (?1, ?2, ?1, ?3)",
        params![tmdb_id, format!("movie{tmdb_id}"), profile_id],
    )
    .unwrap();
}

fn add_list(conn: &Connection, id: i64, profile_id: Option<i64>) {
    conn.execute(
        "INSERT INTO import_lists (id, name, profile_id) VALUES (?1, ?2, ?3)",
        params![id, format!("list{id}"), profile_id],
    )
    .unwrap();
}

fn movie_profiles(conn: &Connection) -> Vec<Option<i64>> {
    column(conn, "SELECT profile_id FROM movies ORDER BY id")
}

fn list_profiles(conn: &Connection) -> Vec<Option<i64>> {
    column(conn, "SELECT profile_id FROM import_lists ORDER BY id")
}

fn column(conn: &Connection, sql: &str) -> Vec<Option<i64>> {
    conn.prepare(sql)
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
