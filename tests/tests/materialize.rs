//! Query materialization integration tests.
//!
//! Plans come from the stub compiler, rows from a scripted executor.
//! Focus areas: round-trip count and order, frontier propagation across
//! levels, empty frontiers, id normalization, failure and cancellation.

use std::time::Instant;

use cham_tests::prelude::*;
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn user_row() -> Row {
    row! { "id" => USER_ID, "email" => "ana@mail.com", "name" => "Ana" }
}

fn order_rows() -> Vec<Row> {
    ORDER_IDS
        .iter()
        .map(|id| row! { "id" => *id, "user_id" => USER_ID, "total" => "10.00" })
        .collect()
}

mod round_trips {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: k_includes_k_plus_one_round_trips ==========
    #[test]
    fn test_two_includes_three_round_trips_in_order() {
        init_tracing();

        // GIVEN a user with 3 orders and 2 items
        let engine = shop_engine(EngineConfig::default().with_debug(DebugLevel::Trace));
        let mut executor = ScriptedExecutor::new()
            .returns(vec![user_row()])
            .returns(order_rows())
            .returns(vec![
                row! { "id" => 1i64, "order_id" => ORDER_IDS[0], "sku" => "A", "quantity" => 1i64 },
                row! { "id" => 2i64, "order_id" => ORDER_IDS[2], "sku" => "B", "quantity" => 3i64 },
            ]);

        // WHEN fetching User with orders and orders.items
        let query = engine.query("User").include("orders").include("orders.items");
        let result = engine
            .fetch(&query, &mut executor, &Cancellation::new())
            .unwrap();

        // THEN exactly 3 round-trips, each fed by the previous level
        assert_eq!(
            executor.statements(),
            &[
                "SELECT * FROM users".to_string(),
                format!("SELECT * FROM orders WHERE user_id IN ('{}')", USER_ID),
                format!(
                    "SELECT * FROM order_items WHERE order_id IN ('{}', '{}', '{}')",
                    ORDER_IDS[0], ORDER_IDS[1], ORDER_IDS[2]
                ),
            ]
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.relation("orders").len(), 3);
        assert_eq!(result.relation("items").len(), 2);
    }

    #[test]
    fn test_no_includes_single_round_trip() {
        let engine = shop_engine(EngineConfig::default());
        let mut executor = ScriptedExecutor::new().returns(vec![user_row()]);

        let result = engine
            .fetch(&engine.query("User").limit(10), &mut executor, &Cancellation::new())
            .unwrap();

        assert_eq!(executor.statements(), &["SELECT * FROM users LIMIT 10".to_string()]);
        assert!(result.relations.is_empty());
    }

    // ========== TEST: empty_frontier ==========
    #[test]
    fn test_empty_main_result_runs_every_level_and_matches_nothing() {
        // GIVEN no users at all
        let engine = shop_engine(EngineConfig::default());
        let mut executor = ScriptedExecutor::new();

        // WHEN fetching with two includes
        let query = engine.query("User").include("orders").include("orders.items");
        let result = engine
            .fetch(&query, &mut executor, &Cancellation::new())
            .unwrap();

        // THEN every eager query runs with IN (NULL) and nothing is returned
        assert!(statements_match(
            executor.statements(),
            &[
                "SELECT * FROM users",
                "SELECT * FROM orders WHERE user_id IN (NULL)",
                "SELECT * FROM order_items WHERE order_id IN (NULL)",
            ]
        ));
        assert!(result.is_empty());
        assert!(result.relation("orders").is_empty());
        assert!(result.relation("items").is_empty());
    }
}

mod frontier {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========== TEST: user_orders_frontier ==========
    #[test]
    fn test_user_with_three_orders() {
        // GIVEN one user and exactly 3 orders
        let schema = shop_schema();
        let compiler = StubCompiler::new(&schema);
        let plan = QueryBuilder::new("User")
            .include("orders")
            .compile(Some(&schema), &compiler)
            .unwrap();
        let mut executor = ScriptedExecutor::new()
            .returns(vec![user_row()])
            .returns(order_rows());

        // WHEN materialized
        let mut materializer = Materializer::new(&schema, &mut executor);
        let result = materializer
            .run("User", &plan, &Cancellation::new())
            .unwrap();

        // THEN orders holds the 3 rows and the frontier is their ids
        assert_eq!(result.relation("orders").len(), 3);
        assert_eq!(
            materializer.frontier(),
            &ORDER_IDS.map(|id| ParentId::Text(id.to_string()))
        );
        assert_eq!(column_ids(result.relation("orders"), "id"), ORDER_IDS.to_vec());
    }

    #[test]
    fn test_native_and_binary_uuids_normalize() {
        // GIVEN the driver returns order ids as native and binary UUIDs
        let first = Uuid::parse_str(ORDER_IDS[0]).unwrap();
        let second = Uuid::parse_str(ORDER_IDS[1]).unwrap();
        let mut executor = ScriptedExecutor::new()
            .returns(vec![user_row()])
            .returns(vec![
                row! { "id" => first, "user_id" => USER_ID },
                row! { "id" => *second.as_bytes(), "user_id" => USER_ID },
            ]);

        // WHEN the items level is substituted
        let engine = shop_engine(EngineConfig::default());
        let query = engine.query("User").include("orders").include("orders.items");
        engine
            .fetch(&query, &mut executor, &Cancellation::new())
            .unwrap();

        // THEN both appear as hyphenated text
        assert_eq!(
            executor.statements()[2],
            format!(
                "SELECT * FROM order_items WHERE order_id IN ('{}', '{}')",
                ORDER_IDS[0], ORDER_IDS[1]
            )
        );
    }

    #[test]
    fn test_integer_keys_stay_numeric() {
        let schema = shop_schema();
        let compiler = StubCompiler::new(&schema);
        let plan = QueryBuilder::new("Order")
            .include("items")
            .compile(Some(&schema), &compiler)
            .unwrap();
        let mut executor = ScriptedExecutor::new()
            .returns(vec![row! { "id" => ORDER_IDS[0] }])
            .returns(vec![
                row! { "id" => 7i64, "order_id" => ORDER_IDS[0] },
                row! { "id" => 8i64, "order_id" => ORDER_IDS[0] },
            ]);

        let mut materializer = Materializer::new(&schema, &mut executor);
        materializer
            .run("Order", &plan, &Cancellation::new())
            .unwrap();

        assert_eq!(materializer.frontier(), &[ParentId::Int(7), ParentId::Int(8)]);
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eager_failure_names_relation_and_returns_nothing() {
        let engine = shop_engine(EngineConfig::default());
        let mut executor = ScriptedExecutor::new()
            .returns(vec![user_row()])
            .returns(order_rows())
            .fails(ExecutorError::database("permission denied for table order_items"));

        let query = engine.query("User").include("orders").include("orders.items");
        let err = engine
            .fetch(&query, &mut executor, &Cancellation::new())
            .err()
            .unwrap();

        assert!(
            matches!(&err, EngineError::Query(e) if e.failed_relation() == Some("items")),
            "{err}"
        );
        assert_eq!(executor.round_trips(), 3);
    }

    #[test]
    fn test_unknown_include_is_a_compiler_error() {
        let engine = shop_engine(EngineConfig::default());
        let mut executor = ScriptedExecutor::new();

        let err = engine
            .fetch(&engine.query("User").include("invoices"), &mut executor, &Cancellation::new())
            .err()
            .unwrap();

        assert!(matches!(err, EngineError::Query(QueryError::Compiler(_))));
        assert_eq!(executor.round_trips(), 0);
    }

    #[test]
    fn test_cancelled_between_levels() {
        // GIVEN a token cancelled while the main query is in flight
        let cancel = Cancellation::new();
        let mut executor = ScriptedExecutor::new()
            .returns(vec![user_row()])
            .cancel_during(1, cancel.clone());

        // WHEN fetching with an include
        let engine = shop_engine(EngineConfig::default());
        let err = engine
            .fetch(&engine.query("User").include("orders"), &mut executor, &cancel)
            .err()
            .unwrap();

        // THEN the eager level never runs
        assert!(matches!(err, EngineError::Query(QueryError::Cancelled)));
        assert_eq!(executor.round_trips(), 1);
    }

    #[test]
    fn test_expired_deadline() {
        let engine = shop_engine(EngineConfig::default());
        let mut executor = ScriptedExecutor::new();
        let cancel = Cancellation::new().with_deadline(Instant::now());

        let err = engine
            .fetch(&engine.query("User"), &mut executor, &cancel)
            .err()
            .unwrap();

        assert!(matches!(err, EngineError::Query(QueryError::DeadlineExceeded)));
        assert_eq!(executor.round_trips(), 0);
    }
}
