use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::{opt_param, param};
use crate::ipc::types::{AppState, Request};
use crate::model::{with_primary_activity, Activity, StudentDraft, StudentId, StudentPatch};
use crate::view::{course_options, distinct_courses, project, ListQuery, SortKey, PREDEFINED_COURSES};
use serde_json::json;

async fn list_result(state: &mut AppState, req: &Request) -> serde_json::Value {
    let students = match state.api.get_students().await {
        Ok(resp) => resp.data,
        Err(e) => return api_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "students": project(&students, &state.list_query),
            "total": students.len(),
            "courses": distinct_courses(&students),
            "query": state.list_query,
        }),
    )
}

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    match opt_param::<ListQuery>(req, "query") {
        Ok(Some(q)) => state.list_query = q,
        Ok(None) => {}
        Err(resp) => return resp,
    }
    list_result(state, req).await
}

async fn handle_sort(state: &mut AppState, req: &Request) -> serde_json::Value {
    let key: SortKey = match param(req, "key") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.list_query.toggle_sort(key);
    list_result(state, req).await
}

async fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let draft: StudentDraft = match param(req, "student") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.api.add_student(draft).await {
        Ok(resp) => ok(&req.id, json!({ "student": resp.data, "status": resp.status })),
        Err(e) => api_err(&req.id, &e),
    }
}

async fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id: StudentId = match param(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut patch: StudentPatch = match opt_param(req, "patch") {
        Ok(v) => v.unwrap_or_default(),
        Err(resp) => return resp,
    };
    let activity: Option<Activity> = match opt_param(req, "activity") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // The edit form carries a single activity that stands in for the first one.
    if let Some(activity) = activity {
        let current = match state.api.get_students().await {
            Ok(resp) => resp
                .data
                .into_iter()
                .find(|s| s.id == id)
                .map(|s| s.activities)
                .unwrap_or_default(),
            Err(e) => return api_err(&req.id, &e),
        };
        patch.activities = Some(with_primary_activity(&current, activity));
    }

    match state.api.update_student(id, patch).await {
        Ok(resp) => ok(&req.id, json!({ "student": resp.data })),
        Err(e) => api_err(&req.id, &e),
    }
}

async fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id: StudentId = match param(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.api.delete_student(id).await {
        Ok(resp) => ok(
            &req.id,
            json!({ "message": resp.data.message, "student": resp.data.student }),
        ),
        Err(e) => api_err(&req.id, &e),
    }
}

async fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.api.reset_data().await {
        Ok(resp) => ok(
            &req.id,
            json!({ "message": resp.data.message, "students": resp.data.students }),
        ),
        Err(e) => api_err(&req.id, &e),
    }
}

async fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.api.get_students().await {
        Ok(resp) => ok(&req.id, json!({ "courses": distinct_courses(&resp.data) })),
        Err(e) => api_err(&req.id, &e),
    }
}

async fn handle_course_options(state: &mut AppState, req: &Request) -> serde_json::Value {
    // The add form still works off the predefined list when the roster can't load.
    let options = match state.api.get_students().await {
        Ok(resp) => course_options(&resp.data),
        Err(_) => PREDEFINED_COURSES.iter().map(|c| c.to_string()).collect(),
    };
    ok(&req.id, json!({ "courses": options }))
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let method = req.method.as_str();
    if !(method.starts_with("students.") || method.starts_with("courses.")) {
        return None;
    }
    if !state.auth.is_logged_in() {
        return Some(err(
            &req.id,
            "not_authenticated",
            "You must be logged in to manage students",
            None,
        ));
    }
    match method {
        "students.list" => Some(handle_list(state, req).await),
        "students.sort" => Some(handle_sort(state, req).await),
        "students.create" => Some(handle_create(state, req).await),
        "students.update" => Some(handle_update(state, req).await),
        "students.delete" => Some(handle_delete(state, req).await),
        "students.reset" => Some(handle_reset(state, req).await),
        "courses.list" => Some(handle_courses_list(state, req).await),
        "courses.options" => Some(handle_course_options(state, req).await),
        _ => None,
    }
}
