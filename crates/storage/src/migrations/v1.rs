//! Migration v1: query, message and errmessage tables

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS query (
    query_id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    server TEXT NOT NULL,
    db TEXT NOT NULL,
    connection_string TEXT NOT NULL,
    query_text TEXT NOT NULL,
    status INTEGER,
    duration REAL,
    rows_affected INTEGER
) STRICT;

CREATE TABLE IF NOT EXISTS message (
    message_id INTEGER PRIMARY KEY AUTOINCREMENT,
    query_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    message TEXT,
    detailed_message TEXT,
    FOREIGN KEY (query_id) REFERENCES query(query_id)
) STRICT;

CREATE TABLE IF NOT EXISTS errmessage (
    errmessage_id INTEGER PRIMARY KEY AUTOINCREMENT,
    query_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    detailed_message TEXT,
    description_message TEXT,
    line INTEGER NOT NULL,
    FOREIGN KEY (query_id) REFERENCES query(query_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_message_query ON message(query_id);
CREATE INDEX IF NOT EXISTS idx_errmessage_query ON errmessage(query_id);
";
