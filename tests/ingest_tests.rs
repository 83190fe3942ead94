//! Integration tests for CSV parse and validate

use bulk_upload::prelude::*;

fn parse(text: &str) -> Result<ParsedBatch, UploadError> {
    parse_and_validate(text, &ValidationConfig::default())
}

#[test]
fn test_full_header_single_row_yields_one_trimmed_order() {
    let text = "id,customerName,address,phoneNumber,items,notes\n\
                \"  ORD9 \",  Mary Major , 9 Elm St ,  +4400 , 1x Lamp ,  fragile  ";
    let batch = parse(text).unwrap();

    assert!(batch.row_errors.is_empty());
    assert_eq!(batch.orders.len(), 1);

    let order = &batch.orders[0];
    assert_eq!(order.id, "ORD9");
    assert_eq!(order.customer_name, "Mary Major");
    assert_eq!(order.address, "9 Elm St");
    assert_eq!(order.phone_number, "+4400");
    assert_eq!(order.items, "1x Lamp");
    assert_eq!(order.notes.as_deref(), Some("fragile"));
}

#[test]
fn test_missing_address_named_regardless_of_other_headers() {
    for header in [
        "id,customerName,phoneNumber,items",
        "items,phoneNumber,customerName,id,notes,extra",
        "phoneNumber,id,items,customerName",
    ] {
        let text = format!("{}\n{}", header, vec!["v"; header.split(',').count()].join(","));
        let err = parse(&text).unwrap_err();

        match err {
            UploadError::MissingHeaders { missing } => {
                assert_eq!(missing, vec![RequiredField::Address], "header: {}", header);
            }
            other => panic!("unexpected error for {}: {:?}", header, other),
        }
    }
}

#[test]
fn test_empty_phone_number_on_first_row() {
    let text = "id,customerName,address,phoneNumber,items\nORD001,John Smith,123 Main St,,2x Laptop";
    let batch = parse(text).unwrap();

    assert!(batch.orders.is_empty());
    let messages: Vec<String> = batch.row_errors.iter().map(ToString::to_string).collect();
    assert_eq!(messages, vec!["Line 2: Missing required fields: phoneNumber"]);
}

#[test]
fn test_trimming_is_idempotent() {
    let text = "id,customerName,address,phoneNumber,items\n  A1 , Ann ,1 St , 555, x ";
    let first = parse(text).unwrap();

    let order = &first.orders[0];
    let retrimmed = format!(
        "id,customerName,address,phoneNumber,items\n{},{},{},{},{}",
        order.id, order.customer_name, order.address, order.phone_number, order.items
    );
    let second = parse(&retrimmed).unwrap();

    assert_eq!(first.orders, second.orders);
}

#[test]
fn test_repeated_runs_carry_no_state() {
    let text = "id,customerName,address,phoneNumber,items\nA1,Ann,1 St,555,x\n,Bob,,556,y";

    let runs: Vec<ParsedBatch> = (0..3).map(|_| parse(text).unwrap()).collect();
    for run in &runs[1..] {
        assert_eq!(run.orders, runs[0].orders);
        assert_eq!(run.row_errors, runs[0].row_errors);
    }
    assert_eq!(
        runs[0].row_errors[0].to_string(),
        "Line 3: Missing required fields: id, address"
    );
}

#[test]
fn test_into_result_success() {
    let text = "id,customerName,address,phoneNumber,items\nA1,Ann,1 St,555,x\nB2,Bob,2 St,556,y";
    let orders = parse(text).unwrap().into_result().unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].id, "B2");
}

#[test]
fn test_into_result_all_or_nothing() {
    let text = "id,customerName,address,phoneNumber,items\nA1,Ann,1 St,555,x\nB2,Bob,2 St,556,";
    let err = parse(text).unwrap().into_result().unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(err.row_errors().len(), 1);
    assert_eq!(err.row_errors()[0].line, 3);
}

#[test]
fn test_batch_policy_apply() {
    let policy = BatchPolicy::default();
    assert_eq!(policy, BatchPolicy::AllOrNothing);
    assert!(policy.apply(Vec::new(), Vec::new()).unwrap().is_empty());
}

#[test]
fn test_unbalanced_quote_is_parse_error() {
    let text = "id,customerName,address,phoneNumber,items\n\"A1,Ann,1 St,555,x\nB2,Bob,2 St,556,y";
    let err = parse(text).unwrap_err();

    assert!(matches!(err, UploadError::Parse { .. }));
}

#[test]
fn test_crlf_line_endings() {
    let text = "id,customerName,address,phoneNumber,items\r\nA1,Ann,1 St,555,x\r\n";
    let batch = parse(text).unwrap();

    assert_eq!(batch.orders.len(), 1);
    assert_eq!(batch.orders[0].items, "x");
}

#[test]
fn test_metrics_reflect_batch() {
    let text = "id,customerName,address,phoneNumber,items\nA1,Ann,1 St,555,x\nB2,,2 St,556,y";
    let batch = parse(text).unwrap();

    assert_eq!(batch.metrics.total_records, 2);
    assert_eq!(batch.metrics.valid_records, 1);
    assert_eq!(batch.metrics.invalid_records, 1);
}
