//! # Table Persistence Test
//!
//! End-to-end coverage of the table lifecycle against real files:
//!
//! - create writes schema.bin and an empty data.bin
//! - prepare/encode/append/row round-trips, defaults and nulls included
//! - in-place updates via set
//! - reloading a table from disk converges with the created instance
//! - row addressing and size violations are rejected with context

use std::collections::HashMap;

use tempfile::tempdir;

use flatdb::{ColumnSchema, Layer, RowSchema, Table, TypeRegistry, Value};

fn user_schema() -> RowSchema {
    RowSchema::new(vec![
        ColumnSchema::new("username", "varchar", 32, false, None),
        ColumnSchema::new("age", "int", 8, false, Some(Value::Int(18))),
        ColumnSchema::new(
            "signature",
            "varchar",
            32,
            false,
            Some(Value::from("no signature yet")),
        ),
        ColumnSchema::new("rating", "int", 8, true, None),
    ])
    .unwrap()
}

fn create_users_table() -> (Table, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let storage = Layer::open(dir.path().join("users")).unwrap();
    let table = Table::create(storage, "users", user_schema()).unwrap();
    (table, dir)
}

fn row_for(table: &Table, values: HashMap<String, Option<Value>>) -> Vec<u8> {
    let tuple = table.schema().prepare(&values).unwrap();
    table.schema().encode(&tuple).unwrap()
}

mod lifecycle_tests {
    use super::*;

    #[test]
    fn create_writes_schema_and_empty_data_file() {
        let (table, dir) = create_users_table();

        assert!(dir.path().join("users").join("schema.bin").is_file());
        assert!(dir.path().join("users").join("data.bin").is_file());
        assert_eq!(table.total_rows().unwrap(), 0);
    }

    #[test]
    fn load_fails_without_a_schema_file() {
        let dir = tempdir().unwrap();
        let storage = Layer::open(dir.path().join("users")).unwrap();

        let registry = TypeRegistry::standard();
        let err = Table::load(&registry, storage, "users").unwrap_err();
        assert!(err.to_string().contains("(table=[name=users]) could not read schema"));
    }

    #[test]
    fn delete_removes_both_files() {
        let (table, dir) = create_users_table();

        table.delete().unwrap();

        assert!(!dir.path().join("users").join("schema.bin").exists());
        assert!(!dir.path().join("users").join("data.bin").exists());
    }
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn sparse_input_is_filled_append_and_read_back() {
        let (table, _dir) = create_users_table();

        let row = row_for(
            &table,
            HashMap::from([("username".to_string(), Some(Value::from("alice")))]),
        );
        assert_eq!(row.len(), 84);
        assert_eq!(table.schema().row_size(), 84);

        table.append(&row).unwrap();
        assert_eq!(table.total_rows().unwrap(), 1);

        let stored = table.row(1).unwrap();
        assert_eq!(stored, row);

        let registry = TypeRegistry::standard();
        let decoded = table.schema().decode(&registry, &stored).unwrap();
        assert_eq!(
            decoded,
            vec![
                Some(Value::from("alice")),
                Some(Value::Int(18)),
                Some(Value::from("no signature yet")),
                None,
            ]
        );
    }

    #[test]
    fn appended_rows_are_addressed_in_insertion_order() {
        let (table, _dir) = create_users_table();

        let mut rows = Vec::new();
        for name in ["ann", "bob", "cyd"] {
            let row = row_for(
                &table,
                HashMap::from([("username".to_string(), Some(Value::from(name)))]),
            );
            table.append(&row).unwrap();
            rows.push(row);
        }

        assert_eq!(table.total_rows().unwrap(), 3);
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(&table.row(index as u64 + 1).unwrap(), row);
        }
    }

    #[test]
    fn set_overwrites_one_row_without_touching_neighbours() {
        let (table, _dir) = create_users_table();

        for name in ["ann", "bob", "cyd"] {
            let row = row_for(
                &table,
                HashMap::from([("username".to_string(), Some(Value::from(name)))]),
            );
            table.append(&row).unwrap();
        }

        let replacement = row_for(
            &table,
            HashMap::from([
                ("username".to_string(), Some(Value::from("beth"))),
                ("age".to_string(), Some(Value::Int(41))),
            ]),
        );
        table.set(2, &replacement).unwrap();

        let registry = TypeRegistry::standard();
        let decoded = table.schema().decode(&registry, &table.row(2).unwrap()).unwrap();
        assert_eq!(decoded[0], Some(Value::from("beth")));
        assert_eq!(decoded[1], Some(Value::Int(41)));

        let first = table.schema().decode(&registry, &table.row(1).unwrap()).unwrap();
        let third = table.schema().decode(&registry, &table.row(3).unwrap()).unwrap();
        assert_eq!(first[0], Some(Value::from("ann")));
        assert_eq!(third[0], Some(Value::from("cyd")));
        assert_eq!(table.total_rows().unwrap(), 3);
    }

    #[test]
    fn reloaded_table_reads_rows_written_before_reload() {
        let dir = tempdir().unwrap();
        let row;
        {
            let storage = Layer::open(dir.path().join("users")).unwrap();
            let table = Table::create(storage, "users", user_schema()).unwrap();
            row = row_for(
                &table,
                HashMap::from([("username".to_string(), Some(Value::from("alice")))]),
            );
            table.append(&row).unwrap();
        }

        let registry = TypeRegistry::standard();
        let storage = Layer::open(dir.path().join("users")).unwrap();
        let table = Table::load(&registry, storage, "users").unwrap();

        assert_eq!(table.schema().row_size(), 84);
        assert_eq!(table.schema().columns().len(), 4);
        assert_eq!(table.total_rows().unwrap(), 1);
        assert_eq!(table.row(1).unwrap(), row);

        let decoded = table.schema().decode(&registry, &row).unwrap();
        assert_eq!(decoded[1], Some(Value::Int(18)));
        assert_eq!(decoded[3], None);
    }

    #[test]
    fn reloaded_schema_keeps_defaults_usable() {
        let dir = tempdir().unwrap();
        {
            let storage = Layer::open(dir.path().join("users")).unwrap();
            Table::create(storage, "users", user_schema()).unwrap();
        }

        let registry = TypeRegistry::standard();
        let storage = Layer::open(dir.path().join("users")).unwrap();
        let table = Table::load(&registry, storage, "users").unwrap();

        let tuple = table
            .schema()
            .prepare(&HashMap::from([(
                "username".to_string(),
                Some(Value::from("dora")),
            )]))
            .unwrap();
        assert_eq!(tuple[2], Some(Value::from("no signature yet")));
    }
}

mod violation_tests {
    use super::*;

    #[test]
    fn row_ids_start_at_one() {
        let (table, _dir) = create_users_table();

        let err = table.row(0).unwrap_err();
        assert!(err.to_string().contains("(table=[name=users]) invalid row [id=0]"));

        let err = table.set(0, &vec![0u8; 84]).unwrap_err();
        assert!(err.to_string().contains("invalid row [id=0]"));
    }

    #[test]
    fn reading_past_the_end_fails() {
        let (table, _dir) = create_users_table();

        let err = table.row(1).unwrap_err();
        assert!(err.to_string().contains("could not read row [id=1]"));
    }

    #[test]
    fn append_rejects_rows_of_the_wrong_size() {
        let (table, _dir) = create_users_table();

        let err = table.append(&[0u8; 83]).unwrap_err();
        assert!(err
            .to_string()
            .contains("row size [bytes=83] differs from the schema [bytes=84]"));
        assert_eq!(table.total_rows().unwrap(), 0);
    }

    #[test]
    fn set_rejects_rows_of_the_wrong_size() {
        let (table, _dir) = create_users_table();

        let row = row_for(
            &table,
            HashMap::from([("username".to_string(), Some(Value::from("ann")))]),
        );
        table.append(&row).unwrap();

        let err = table.set(1, &[0u8; 85]).unwrap_err();
        assert!(err
            .to_string()
            .contains("row size [bytes=85] differs from the schema [bytes=84]"));
        assert_eq!(table.row(1).unwrap(), row);
    }

    #[test]
    fn prepare_rejects_missing_required_values() {
        let (table, _dir) = create_users_table();

        let err = table.schema().prepare(&HashMap::new()).unwrap_err();
        assert!(err
            .to_string()
            .contains("(row=[column_position=0, column_name=username]) validation failed"));
    }
}
