// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::api::{ApiClient, Credential, LedgerSource};
use finboard::error::ClientError;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Serves `responses` in order, one per connection, and reports each request line.
fn stub_server(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (seen_tx, seen_rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
            }
            let mut req_body = vec![0u8; content_length];
            reader.read_exact(&mut req_body).unwrap();
            seen_tx
                .send(format!(
                    "{} {}",
                    request_line.trim(),
                    String::from_utf8_lossy(&req_body)
                ))
                .unwrap();

            let mut stream = stream;
            let reply = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });
    (format!("http://{}", addr), seen_rx)
}

#[test]
fn endpoint_appends_api_key_and_escapes_ids() {
    let client = ApiClient::new("https://example.org/portal", Credential::new(" tok en "), 5)
        .unwrap();
    let url = client.endpoint("transactions", None).unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.org/portal/api/finance/transactions?apiKey=tok+en"
    );
    let url = client.endpoint("transactions", Some("a/b")).unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.org/portal/api/finance/transactions/a%2Fb?apiKey=tok+en"
    );
}

#[test]
fn credential_debug_hides_token() {
    let c = Credential::new("secret-token");
    assert!(!format!("{:?}", c).contains("secret"));
}

#[test]
fn fetch_ledger_reads_all_four_collections() {
    let (base, seen) = stub_server(vec![
        (
            200,
            r#"[{"id": 1, "name": "Main", "type": "checking", "balance": "500"}]"#.into(),
        ),
        (
            200,
            r#"{"data": [{"id": 2, "name": "Rent", "type": "expense"}]}"#.into(),
        ),
        (
            200,
            r#"[{"id": 3, "amount": "100", "type": "expense", "categoryId": 2, "accountId": 1, "date": "2025-02-01"},
                {"id": 4, "amount": "oops", "type": "expense", "date": "2025-02-01"}]"#
                .into(),
        ),
        (200, "[]".into()),
    ]);
    let client = ApiClient::new(&base, Credential::new("dev"), 5).unwrap();
    let (ledger, report) = client.load_ledger().unwrap();

    assert_eq!(ledger.accounts.len(), 1);
    assert_eq!(ledger.categories[0].name, "Rent");
    assert_eq!(ledger.transactions.len(), 1);
    assert!(ledger.budgets.is_empty());
    assert_eq!(report.skipped.len(), 1);

    let first = seen.recv().unwrap();
    assert!(first.starts_with("GET /api/finance/accounts?apiKey=dev "));
    assert!(seen.recv().unwrap().contains("/api/finance/categories"));
    assert!(seen.recv().unwrap().contains("/api/finance/transactions"));
    assert!(seen.recv().unwrap().contains("/api/finance/budgets"));
}

#[test]
fn unauthorized_is_mapped() {
    let (base, _seen) = stub_server(vec![(401, r#"{"error": "bad token"}"#.into())]);
    let client = ApiClient::new(&base, Credential::new("wrong"), 5).unwrap();
    assert!(matches!(client.verify(), Err(ClientError::Unauthorized)));
}

#[test]
fn server_errors_keep_status_and_body() {
    let (base, _seen) = stub_server(vec![(503, "maintenance".into())]);
    let client = ApiClient::new(&base, Credential::new("dev"), 5).unwrap();
    match client.fetch_ledger() {
        Err(ClientError::Server { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn create_transaction_posts_draft_and_decodes_reply() {
    let (base, seen) = stub_server(vec![(
        201,
        r#"{"data": {"id": "t-new", "description": "Bus hire", "amount": "250.00",
            "type": "expense", "categoryId": "c1", "accountId": "a1", "date": "2025-07-04"}}"#
            .into(),
    )]);
    let client = ApiClient::new(&base, Credential::new("dev"), 5).unwrap();
    let draft = finboard::api::TransactionDraft {
        description: "Bus hire".into(),
        amount: "250.00".parse().unwrap(),
        kind: finboard::models::TransactionType::Expense,
        category_id: "c1".into(),
        account_id: "a1".into(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
        tags: vec!["trip".into()],
        notes: None,
    };
    let created = client.create_transaction(&draft).unwrap();
    assert_eq!(created.id, "t-new");

    let req = seen.recv().unwrap();
    assert!(req.starts_with("POST /api/finance/transactions?apiKey=dev "));
    assert!(req.contains(r#""categoryId":"c1""#));
    assert!(req.contains(r#""amount":"250.00""#));
    assert!(req.contains(r#""type":"expense""#));
}

#[test]
fn update_transaction_puts_to_the_record_path() {
    let (base, seen) = stub_server(vec![(
        200,
        r#"{"id": "t-9", "description": "Venue deposit", "amount": "120",
            "type": "expense", "categoryId": "c1", "accountId": "a1", "date": "2025-07-05"}"#
            .into(),
    )]);
    let client = ApiClient::new(&base, Credential::new("dev"), 5).unwrap();
    let draft = finboard::api::TransactionDraft {
        description: "Venue deposit".into(),
        amount: "120".parse().unwrap(),
        kind: finboard::models::TransactionType::Expense,
        category_id: "c1".into(),
        account_id: "a1".into(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
        tags: vec![],
        notes: Some("paid by card".into()),
    };
    let updated = client.update_transaction("t-9", &draft).unwrap();
    assert_eq!(updated.id, "t-9");
    assert_eq!(updated.amount, rust_decimal::Decimal::from(120));

    let req = seen.recv().unwrap();
    assert!(req.starts_with("PUT /api/finance/transactions/t-9?apiKey=dev "));
    assert!(req.contains(r#""notes":"paid by card""#));
}

#[test]
fn delete_transaction_targets_the_record_path() {
    let (base, seen) = stub_server(vec![(204, String::new()), (404, "gone".into())]);
    let client = ApiClient::new(&base, Credential::new("dev"), 5).unwrap();
    client.delete_transaction("t-9").unwrap();
    assert!(matches!(
        client.delete_transaction("t-9"),
        Err(ClientError::NotFound)
    ));

    let req = seen.recv().unwrap();
    assert!(req.starts_with("DELETE /api/finance/transactions/t-9?apiKey=dev "));
    assert!(seen.recv().unwrap().starts_with("DELETE "));
}
