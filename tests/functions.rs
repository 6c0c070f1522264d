#[cfg(test)]
mod row_functions {
    use std::cell::Cell;

    use ferrum_table::TableError;
    use ferrum_table::storage::{Column, DataType, DataValue, Table};

    fn _create_table() -> Table {
        Table::of_columns(vec![
            Column::of_array("x", vec![1_i64, 2, 3]),
            Column::of_array("y", vec![2_i64, 4, 6]),
        ])
        .unwrap()
    }

    #[test]
    fn filter_keeps_matching_rows() {
        let filtered = _create_table().filter(&["x"], |x: i64| x > 1).unwrap();

        assert_eq!(filtered.rows_count(), 2);
        assert_eq!(filtered.item_by_name("x").unwrap().array::<i64>().unwrap(), &[2, 3]);
        assert_eq!(filtered.item_by_name("y").unwrap().array::<i64>().unwrap(), &[4, 6]);
    }

    #[test]
    fn filter_is_idempotent() {
        let once = _create_table().filter(&["y"], |y: i64| y != 4).unwrap();
        let twice = once.filter(&["y"], |y: i64| y != 4).unwrap();

        assert_eq!(once.rows_count(), twice.rows_count());
        for row in 0..once.rows_count() {
            assert_eq!(once.row(row).unwrap(), twice.row(row).unwrap());
        }
    }

    #[test]
    fn filter_over_two_columns_preserves_order() {
        let filtered = _create_table()
            .filter(&["x", "y"], |x: i64, y: i64| x + y != 6)
            .unwrap();

        assert_eq!(filtered.item(0).unwrap().array::<i64>().unwrap(), &[1, 3]);
    }

    #[test]
    fn filter_leaves_unread_columns_unforced() {
        let table = Table::of_columns(vec![
            Column::of_lazy_array("x", || vec![1_i64, 2, 3], 3),
            Column::of_lazy_array("label", || vec!["a".to_string(), "b".to_string(), "c".to_string()], 3),
        ])
        .unwrap();
        let filtered = table.filter(&["x"], |x: i64| x != 2).unwrap();

        assert!(!table.item_by_name("label").unwrap().is_forced());
        assert!(!filtered.item_by_name("label").unwrap().is_forced());
        assert_eq!(
            filtered.item_by_name("label").unwrap().array::<String>().unwrap(),
            &["a".to_string(), "c".to_string()]
        );
    }

    fn _assert_data_integrity(result: ferrum_table::Result<()>, expected: usize, actual: usize) {
        match result {
            Err(TableError::DataIntegrity {
                column,
                expected: declared,
                actual: held,
            }) => {
                assert_eq!(column, "bad");
                assert_eq!(declared, expected);
                assert_eq!(held, actual);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn filter_keeps_data_integrity_failures_of_unread_columns() {
        let table = _create_table()
            .add(Column::of_lazy_array("bad", || vec![10_i64, 20], 3))
            .unwrap();
        let filtered = table.filter(&["x"], |x: i64| x < 3).unwrap();
        let bad = filtered.item_by_name("bad").unwrap();

        assert_eq!(bad.height(), 2);
        assert!(bad.array::<i64>().is_err());
        _assert_data_integrity(bad.force(), 3, 2);
    }

    #[test]
    fn repeated_filters_keep_data_integrity_failures() {
        let table = _create_table()
            .add(Column::of_lazy_array("bad", || vec![10_i64, 20, 30, 40], 3))
            .unwrap();
        let filtered = table
            .filter(&["x"], |x: i64| x > 1)
            .unwrap()
            .filter(&["y"], |y: i64| y > 4)
            .unwrap();

        _assert_data_integrity(filtered.item_by_name("bad").unwrap().force(), 3, 4);
        assert!(filtered.map(&["bad"], |v: i64| v).is_err());
    }

    #[test]
    fn filteri_receives_the_row_index() {
        let filtered = _create_table()
            .filteri(&["x"], |row: usize, _x: i64| row % 2 == 0)
            .unwrap();

        assert_eq!(filtered.item(0).unwrap().array::<i64>().unwrap(), &[1, 3]);
    }

    #[test]
    fn map_is_lazy_and_repeatable() {
        let table = _create_table();
        let calls = Cell::new(0);
        let mut rows = table
            .map(&["x"], |x: i64| {
                calls.set(calls.get() + 1);
                x * 10
            })
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(calls.get(), 0);
        assert_eq!(rows.next(), Some(10));
        assert_eq!(calls.get(), 1);

        let again: Vec<i64> = table.map(&["x"], |x: i64| x * 10).unwrap().collect();
        assert_eq!(again, vec![10, 20, 30]);
    }

    #[test]
    fn map_with_zero_parameters() {
        let rows: Vec<&str> = _create_table().map(&[], || "row").unwrap().collect();

        assert_eq!(rows, vec!["row"; 3]);
    }

    #[test]
    fn map_results_may_carry_errors() {
        let results: Vec<Result<i64, String>> = _create_table()
            .map(&["x"], |x: i64| if x == 2 { Err("two".to_string()) } else { Ok(x) })
            .unwrap()
            .collect();

        assert_eq!(results[0], Ok(1));
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(3));
    }

    #[test]
    fn mapi_passes_index_first() {
        let rows: Vec<i64> = _create_table()
            .mapi(&["y"], |row: usize, y: i64| row as i64 * 100 + y)
            .unwrap()
            .collect();

        assert_eq!(rows, vec![2, 104, 206]);
    }

    #[test]
    fn map_to_column_adds_a_column() {
        let table = _create_table();
        let summed = table
            .map_to_column(&["x", "y"], "sum", |x: i64, y: i64| x + y)
            .unwrap();

        assert_eq!(table.count(), 2);
        assert_eq!(summed.count(), 3);
        assert_eq!(summed.names(), vec!["x", "y", "sum"]);
        assert_eq!(summed.item_by_name("sum").unwrap().array::<i64>().unwrap(), &[3, 6, 9]);
    }

    #[test]
    fn map_to_column_replaces_an_existing_name_in_place() {
        let replaced = _create_table()
            .map_to_column(&["x"], "x", |x: i64| x as f64 / 2.0)
            .unwrap();

        assert_eq!(replaced.count(), 2);
        assert_eq!(replaced.names(), vec!["x", "y"]);
        assert_eq!(replaced.item(0).unwrap().kind(), DataType::Real);
        assert_eq!(replaced.item(0).unwrap().array::<f64>().unwrap(), &[0.5, 1.0, 1.5]);
    }

    #[test]
    fn mapi_to_column() {
        let indexed = _create_table()
            .mapi_to_column(&[], "row", |row: usize| row % 2 == 1)
            .unwrap();

        assert_eq!(
            indexed.item_by_name("row").unwrap().array::<bool>().unwrap(),
            &[false, true, false]
        );
    }

    #[test]
    fn wrong_column_count_evaluates_nothing() {
        let calls = Cell::new(0);
        let result = _create_table().filter(&["x"], |x: i64, y: i64| {
            calls.set(calls.get() + 1);
            x < y
        });

        assert!(matches!(
            result,
            Err(TableError::ArityMismatch {
                expected: 2,
                supplied: 1
            })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn wrong_column_kind_is_reported_with_its_position() {
        let result = _create_table().map_to_column(&["x", "y"], "z", |x: i64, y: f64| x as f64 + y);

        match result {
            Err(TableError::ColumnTypeMismatch {
                column,
                position,
                expected,
                actual,
            }) => {
                assert_eq!(column, "y");
                assert_eq!(position, 1);
                assert_eq!(expected, DataType::Real);
                assert_eq!(actual, DataType::Integer);
            }
            other => panic!("unexpected: {:?}", other.map(|table| table.count())),
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        let result = _create_table().filter(&["nope"], |_v: i64| true);

        assert!(matches!(result, Err(TableError::NameNotFound(name)) if name == "nope"));
    }

    #[test]
    fn data_value_parameter_accepts_any_kind() {
        let table = _create_table()
            .add(Column::of_array("flag", vec![true, false, true]))
            .unwrap();
        let rendered: Vec<String> = table
            .map(&["x", "flag"], |x: DataValue, flag: DataValue| format!("{}:{}", x, flag))
            .unwrap()
            .collect();

        assert_eq!(rendered, vec!["1:true", "2:false", "3:true"]);
    }

    #[test]
    fn data_value_results_of_one_kind_make_a_column() {
        let table = _create_table()
            .map_to_column(&["x"], "label", |x: i64| DataValue::Text(format!("#{}", x)))
            .unwrap();

        assert_eq!(table.item_by_name("label").unwrap().kind(), DataType::Text);
    }

    #[test]
    fn mixed_data_value_results_are_rejected() {
        let result = _create_table().map_to_column(&["x"], "mixed", |x: i64| {
            if x > 1 {
                DataValue::Integer(x)
            } else {
                DataValue::from("small")
            }
        });

        assert!(matches!(result, Err(TableError::UnsupportedColumnType(_))));
    }

    #[test]
    fn data_value_results_over_no_rows() {
        let empty = _create_table().filter(&["x"], |_x: i64| false).unwrap();
        let mapped = empty
            .map_to_column(&["x"], "v", |x: i64| DataValue::Integer(x))
            .unwrap();

        assert_eq!(mapped.rows_count(), 0);
        assert_eq!(mapped.item_by_name("v").unwrap().kind(), DataType::Text);
    }
}

#[cfg(test)]
mod array_functions {
    use ferrum_table::TableError;
    use ferrum_table::storage::{Column, Table};

    fn _create_table() -> Table {
        Table::of_columns(vec![
            Column::of_array("x", vec![1_i64, 2, 3]),
            Column::of_array("y", vec![2_i64, 4, 6]),
        ])
        .unwrap()
    }

    #[test]
    fn transform_sees_whole_arrays() {
        let dot = _create_table()
            .transform(&["x", "y"], |x: &[i64], y: &[i64]| {
                x.iter().zip(y).map(|(a, b)| a * b).sum::<i64>()
            })
            .unwrap();

        assert_eq!(dot, 28);
    }

    #[test]
    fn transform_checks_kinds() {
        let result = _create_table().transform(&["x"], |x: &[String]| x.len());

        assert!(matches!(
            result,
            Err(TableError::ColumnTypeMismatch { position: 0, .. })
        ));
    }

    #[test]
    fn transform_checks_arity() {
        let result = _create_table().transform(&["x", "y"], |x: &[i64]| x.len());

        assert!(matches!(
            result,
            Err(TableError::ArityMismatch {
                expected: 1,
                supplied: 2
            })
        ));
    }

    #[test]
    fn append_transform_adds_produced_columns() {
        let table = _create_table()
            .append_transform(&["x"], |x: &[i64]| {
                Table::of_columns(vec![Column::of_array(
                    "double",
                    x.iter().map(|v| v * 2).collect::<Vec<i64>>(),
                )])
                .unwrap()
            })
            .unwrap();

        assert_eq!(table.names(), vec!["x", "y", "double"]);
        assert_eq!(table.item(2).unwrap().array::<i64>().unwrap(), &[2, 4, 6]);
    }

    #[test]
    fn append_transform_with_other_row_count_fails() {
        let result = _create_table().append_transform(&["x"], |x: &[i64]| {
            Table::of_columns(vec![Column::of_array("first", vec![x[0]])]).unwrap()
        });

        assert!(matches!(
            result,
            Err(TableError::SchemaMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }
}
