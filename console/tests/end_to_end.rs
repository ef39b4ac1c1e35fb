//! Console session against the live mock server over ureq.

mod common;

use chrono::NaiveDate;
use common::{form_answers, login_answers, ScriptedTerminal};
use surgical_console::{Controller, UreqTransport};
use surgical_core::{NameMatch, RecordService, RecordsClient};

fn start_mock_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn add_browse_and_export_against_mock_server() {
    let addr = start_mock_server();
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("records.pdf");

    let mut input = vec!["admin".to_string(), "wrong".to_string()];
    input.extend(login_answers());
    input.push("1".to_string());
    input.extend(form_answers(&[
        ("HOSPITAL", "Santa Casa"),
        ("NOME", "Ana Silva"),
        ("EQUIPE", "Cirurgião: Dr. A, Primeiro Auxiliar: Dr. B"),
    ]));
    input.extend(["2", "e", "b", "q"].map(String::from));

    let service = RecordService::new(
        RecordsClient::new(&format!("http://{addr}")),
        UreqTransport::new(),
    );
    let mut controller = Controller::new(service, ScriptedTerminal::new(input), &export_path)
        .with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    controller.run().unwrap();

    let transcript = controller.terminal().transcript();
    assert!(transcript.contains("Invalid credentials!"));
    assert!(transcript.contains("Login successful!"));
    assert!(transcript.contains("Data added successfully!"));
    let table = controller.terminal().last_table().unwrap();
    assert!(table.contains("Ana Silva"));
    assert!(table.contains("2024-06-01"));

    let pdf = std::fs::read(&export_path).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    match controller.service().record_by_name("Ana Silva").unwrap() {
        NameMatch::Unique(record) => {
            assert!(record.id.is_some());
            assert_eq!(record.hospital(), "Santa Casa");
        }
        other => panic!("expected unique match, got {other:?}"),
    }
}
