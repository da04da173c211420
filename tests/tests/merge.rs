//! Multi-file schema integration tests.
//!
//! Focus areas: line provenance across files, duplicate detection, loading
//! from directories, compiler errors mapped back to their file.

use std::fs;
use std::sync::Arc;

use cham_compiler::{CompilerError, ParseErrorDetail};
use cham_tests::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const USERS: &str = "entity User {\n    id: uuid primary,\n    email: string unique,\n    name: string,\n}\n";
const ORDERS: &str = "entity Order {\n    id: uuid primary,\n    user_id: uuid,\n    total: decimal,\n}\n";

mod provenance {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: line_in_second_file ==========
    #[test]
    fn test_line_inside_second_file_maps_back() {
        // GIVEN A.cham and B.cham, passed in reverse order
        let merged = merge(&[
            SchemaSource::new("B.cham", ORDERS),
            SchemaSource::new("A.cham", USERS),
        ])
        .unwrap();

        // WHEN locating B's "total" line (A: 3 banner + 5 lines + blank, B: 3 banner)
        let total_line = merged
            .content
            .lines()
            .position(|l| l.contains("total: decimal"))
            .unwrap()
            + 1;

        // THEN it resolves to B.cham line 4
        assert_eq!(total_line, 16);
        assert_eq!(merged.resolve(total_line), Some(SourceLine::new("B.cham", 4)));
        assert_eq!(merged.files, vec!["A.cham".to_string(), "B.cham".to_string()]);
    }

    #[test]
    fn test_every_content_line_is_mapped() {
        let merged = merge(&[
            SchemaSource::new("A.cham", USERS),
            SchemaSource::new("B.cham", ORDERS),
        ])
        .unwrap();

        assert_eq!(merged.line_map.len(), 10);
        for (merged_line, source) in &merged.line_map {
            let text = merged.content.lines().nth(merged_line - 1).unwrap();
            let original = if source.file == "A.cham" { USERS } else { ORDERS };
            assert_eq!(text, original.lines().nth(source.line - 1).unwrap());
        }
    }
}

mod duplicates {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: duplicate_user ==========
    #[test]
    fn test_duplicate_user_reported_once() {
        // GIVEN User declared in two files
        let err = merge(&[
            SchemaSource::new("users.cham", USERS),
            SchemaSource::new("legacy.cham", USERS),
            SchemaSource::new("orders.cham", ORDERS),
        ])
        .unwrap_err();

        // THEN one aggregated error naming it
        let message = err.to_string();
        assert!(message.contains("User (appears 2 times)"), "{message}");
        assert!(!message.contains("Order ("));
        assert!(message.ends_with("Define each entity only once."));
    }

    #[test]
    fn test_all_duplicates_listed_sorted() {
        let err = merge(&[
            SchemaSource::new("a.cham", ORDERS),
            SchemaSource::new("b.cham", USERS),
            SchemaSource::new("c.cham", ORDERS),
            SchemaSource::new("d.cham", USERS),
            SchemaSource::new("e.cham", USERS),
        ])
        .unwrap_err();

        assert!(matches!(
            &err,
            MergeError::DuplicateEntities { duplicates }
                if duplicates == &vec![("Order".to_string(), 2), ("User".to_string(), 3)]
        ));
    }
}

mod loading {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders.cham"), ORDERS).unwrap();
        fs::write(dir.path().join("users.cham"), USERS).unwrap();
        fs::write(dir.path().join("README.md"), "not a schema").unwrap();
        dir
    }

    #[test]
    fn test_loader_reads_only_schema_files_sorted() {
        let dir = schema_dir();

        let sources = FileLoader::new([dir.path()]).load_all().unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["orders.cham", "users.cham"]);
        assert_eq!(sources[1].content, USERS);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();

        let err = FileLoader::new([dir.path()]).load_all().unwrap_err();

        assert!(matches!(err, MergeError::NoSchemaFiles { .. }));
    }

    // ========== TEST: engine_remaps_compiler_errors ==========
    #[test]
    fn test_engine_points_compiler_errors_at_source_file() {
        init_tracing();

        // GIVEN users.cham line 3 sits at merged line 15
        // (orders.cham: 3 banner + 5 lines + blank; users.cham: 3 banner)
        let dir = schema_dir();
        let compiler = StubCompiler::new(&shop_schema()).rejecting(vec![CompilerError::parse(
            ParseErrorDetail::new("unknown modifier 'unique'", 15, 19)
                .with_snippet("  15 │     email: string unique,")
                .with_suggestion("Did you mean 'unique()'?"),
        )]);
        let mut engine = Engine::builder()
            .compiler(Arc::new(compiler))
            .mutation_factory(Arc::new(SqlMutationFactory))
            .build()
            .unwrap();

        // WHEN the directory is loaded
        let err = engine.load_schema_paths([dir.path()]).err().unwrap();

        // THEN the message names users.cham:3
        let EngineError::SchemaRejected { errors } = &err else {
            panic!("expected SchemaRejected, got {err}");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error in users.cham:3\n"), "{}", errors[0]);
        assert!(errors[0].contains("--> users.cham:3:19"), "{}", errors[0]);
        assert!(errors[0].contains("Help: Did you mean 'unique()'?"));
        assert!(engine.schema().is_none());
    }

    #[test]
    fn test_engine_loads_directory() {
        let dir = schema_dir();
        let mut engine = Engine::builder()
            .compiler(Arc::new(StubCompiler::new(&shop_schema())))
            .mutation_factory(Arc::new(SqlMutationFactory))
            .build()
            .unwrap();

        let schema = engine.load_schema_paths([dir.path()]).unwrap();

        assert_eq!(schema.entity_names(), vec!["Order", "OrderItem", "User"]);
        assert!(engine.generate_migration().unwrap().contains("CREATE TABLE order_items"));
    }
}
