//! SQLite schema definitions for the release catalog database.
//!
//! Artists are looked up by their unique name, every release owns at most
//! one album, and artists are linked to releases through `artist_releases`.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const ARTIST_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const RELEASE_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "releases",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

const RELEASES_TABLE: Table = Table {
    name: "releases",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("released_at", &SqlType::Integer, non_null = true), // unix seconds
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_releases_released_at", "released_at"),
        ("idx_releases_name", "name"),
    ],
    unique_constraints: &[],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "duration_in_minutes",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FOREIGN_KEY)
        ),
        sqlite_column!(
            "release_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&RELEASE_FOREIGN_KEY)
        ),
    ],
    indices: &[("idx_albums_artist", "artist_id")],
    // One album per release
    unique_constraints: &[&["release_id"]],
};

const ARTIST_RELEASES_TABLE: Table = Table {
    name: "artist_releases",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FOREIGN_KEY)
        ),
        sqlite_column!(
            "release_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&RELEASE_FOREIGN_KEY)
        ),
    ],
    indices: &[(
        "idx_artist_releases_release_artist",
        "release_id, artist_id",
    )],
    unique_constraints: &[&["artist_id", "release_id"]],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        RELEASES_TABLE,
        ALBUMS_TABLE,
        ARTIST_RELEASES_TABLE,
    ],
}];
