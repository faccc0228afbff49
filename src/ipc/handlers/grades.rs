use crate::grades::{grade_label_to_performance, performance_to_grade};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

// Keeps the form's grade and performance fields in step while the user types.

fn handle_from_performance(req: &Request) -> serde_json::Value {
    let performance: u8 = match param(req, "performance") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if performance > 100 {
        return err(
            &req.id,
            "bad_params",
            "performance must be between 0 and 100",
            None,
        );
    }
    let grade = performance_to_grade(performance);
    ok(&req.id, json!({ "grade": grade, "band": grade.band() }))
}

fn handle_to_performance(req: &Request) -> serde_json::Value {
    let grade: String = match param(req, "grade") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "performance": grade_label_to_performance(&grade) }),
    )
}

pub async fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.fromPerformance" => Some(handle_from_performance(req)),
        "grades.toPerformance" => Some(handle_to_performance(req)),
        _ => None,
    }
}
