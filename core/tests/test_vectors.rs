//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Bodies are compared as parsed JSON so field
//! ordering does not matter.

use petbook_core::{ApiError, DeleteSummary, HttpMethod, HttpRequest, HttpResponse, Pet, PetClient};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

fn client() -> PetClient {
    PetClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    let body: Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_error(name: &str, case: &Value, err: ApiError) {
    match (case["expected_error"].as_str().unwrap(), err) {
        ("Rejected", ApiError::Rejected(reason)) => {
            assert_eq!(reason, case["expected_reason"].as_str().unwrap(), "{name}: reason")
        }
        ("HttpError", ApiError::HttpError { status, .. }) => {
            assert_eq!(status, case["simulated_response"]["status"], "{name}: status")
        }
        (expected, err) => panic!("{name}: expected {expected}, got {err}"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Pet = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let expected_headers: Vec<(String, String)> = case["expected_request"]["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let result = c.parse_create(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
        } else {
            let expected: Pet = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[test]
fn read_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/read.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_read(&case["filter"]).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_read(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
        } else {
            let expected: Vec<Pet> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_update(&case["filter"], &case["update"]).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, result.unwrap_err());
        } else {
            let expected: Vec<Pet> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_delete(&case["filter"]).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let summary = c.parse_delete(simulated(&case)).unwrap();
        let expected: DeleteSummary = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(summary, expected, "{name}: parsed result");
    }
}
