//! Integration tests for the resource family routes.
//!
//! Drives the fully assembled router: loader, policy gate, handlers and the
//! membership workflow.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{admin, gov, request, user, TestApp};
use devex_server::bootstrap::default_modules;
use devex_server::domain::foundation::ResourceId;
use devex_server::domain::resource::{Member, Resource, ResourceDraft, ResourceKind};
use devex_server::ports::ResourceRepository;

async fn seed(app: &TestApp, kind: ResourceKind, owner: &str, title: &str) -> Resource {
    let owner = user(owner);
    let resource = Resource::create(
        kind,
        Member::from(&owner),
        ResourceDraft {
            title: title.to_string(),
            short: format!("{title} in short"),
            description: String::new(),
        },
    )
    .unwrap();
    app.resources.save(&resource).await.unwrap();
    resource
}

// =============================================================================
// Policy gate
// =============================================================================

#[tokio::test]
async fn guests_can_list_programs() {
    let app = TestApp::spawn().await;
    seed(&app, ResourceKind::Program, "owner", "Digital Academy").await;

    let response = app.get("/api/programs", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Digital Academy");
}

#[tokio::test]
async fn guest_create_is_denied_before_the_handler() {
    let app = TestApp::spawn().await;

    let response = app
        .send(request(
            "POST",
            "/api/programs",
            None,
            Some(json!({ "title": "Sneaky" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({ "message": "User is not authorized" }));
    assert_eq!(app.resources.count().await, 0);
}

#[tokio::test]
async fn plain_user_cannot_create_programs_but_can_create_orgs() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_in(&user("alice")).await;

    let denied = app
        .send(request(
            "POST",
            "/api/programs",
            Some(&cookie),
            Some(json!({ "title": "Program" })),
        ))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app
        .send(request(
            "POST",
            "/api/orgs",
            Some(&cookie),
            Some(json!({ "title": "Acme Consulting" })),
        ))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let body = created.json();
    assert_eq!(body["kind"], "org");
    assert_eq!(body["owner"]["userId"], "alice");
    assert_eq!(body["userIs"]["admin"], true);
}

#[tokio::test]
async fn admin_creates_and_deletes_programs() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_in(&admin("root")).await;

    let created = app
        .send(request(
            "POST",
            "/api/programs",
            Some(&cookie),
            Some(json!({ "title": "Code With Us" })),
        ))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let id = created.json()["id"].as_str().unwrap().to_string();

    let deleted = app
        .send(request(
            "DELETE",
            &format!("/api/programs/{id}"),
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.resources.count().await, 0);
}

#[tokio::test]
async fn owner_passes_the_gate_without_a_role_grant() {
    let app = TestApp::spawn().await;
    let program = seed(&app, ResourceKind::Program, "owner", "Sprint With Us").await;
    let cookie = app.sign_in(&user("owner")).await;

    let response = app
        .send(request(
            "PUT",
            &format!("/api/programs/{}", program.id),
            Some(&cookie),
            Some(json!({ "short": "Agile teams" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["short"], "Agile teams");
    assert_eq!(response.json()["title"], "Sprint With Us");
}

#[tokio::test]
async fn other_users_cannot_update() {
    let app = TestApp::spawn().await;
    let program = seed(&app, ResourceKind::Program, "owner", "Sprint With Us").await;
    let cookie = app.sign_in(&gov("mallory")).await;

    let response = app
        .send(request(
            "PUT",
            &format!("/api/programs/{}", program.id),
            Some(&cookie),
            Some(json!({ "title": "Hijacked" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let stored = app
        .resources
        .find(ResourceKind::Program, &program.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Sprint With Us");
}

#[tokio::test]
async fn method_override_turns_post_into_delete() {
    let app = TestApp::spawn().await;
    let project = seed(&app, ResourceKind::Project, "owner", "Portal").await;
    let cookie = app.sign_in(&user("owner")).await;

    let mut req = request(
        "POST",
        &format!("/api/projects/{}", project.id),
        Some(&cookie),
        None,
    );
    req.headers_mut()
        .insert("x-http-method-override", "DELETE".parse().unwrap());
    let response = app.send(req).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.resources.count().await, 0);
}

// =============================================================================
// Parameter loader
// =============================================================================

#[tokio::test]
async fn unknown_id_is_404_with_family_message() {
    let app = TestApp::spawn().await;

    let response = app
        .get(&format!("/api/programs/{}", ResourceId::new()), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({ "message": "No program with that identifier has been found" })
    );
}

#[tokio::test]
async fn malformed_id_is_404() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/opportunities/not-an-id", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json()["message"],
        "No opportunity with that identifier has been found"
    );
}

#[tokio::test]
async fn undecodable_id_is_404_not_400() {
    let app = TestApp::spawn().await;

    for uri in ["/api/programs/%FF", "/api/programs/members/%FF"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            response.json(),
            json!({ "message": "No program with that identifier has been found" }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn ids_of_another_family_are_not_found() {
    let app = TestApp::spawn().await;
    let org = seed(&app, ResourceKind::Org, "owner", "Acme").await;

    let response = app.get(&format!("/api/projects/{}", org.id), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_id_on_guarded_admin_route_is_404_not_403() {
    let app = TestApp::spawn().await;

    let response = app
        .get(&format!("/api/orgs/requests/{}", ResourceId::new()), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Read, members and scaffold
// =============================================================================

#[tokio::test]
async fn read_reports_viewer_relationship() {
    let app = TestApp::spawn().await;
    let org = seed(&app, ResourceKind::Org, "owner", "Acme").await;

    let anonymous = app.get(&format!("/api/orgs/{}", org.id), None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(
        anonymous.json()["userIs"],
        json!({ "admin": false, "member": false, "request": false })
    );

    let cookie = app.sign_in(&user("owner")).await;
    let owner = app.get(&format!("/api/orgs/{}", org.id), Some(&cookie)).await;
    assert_eq!(
        owner.json()["userIs"],
        json!({ "admin": true, "member": true, "request": false })
    );
}

#[tokio::test]
async fn members_route_is_open() {
    let app = TestApp::spawn().await;
    let project = seed(&app, ResourceKind::Project, "owner", "Portal").await;

    let response = app
        .get(&format!("/api/projects/members/{}", project.id), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["userId"], "owner");
}

#[tokio::test]
async fn scaffold_is_empty_and_typed() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/new/opportunity", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "kind": "opportunity", "title": "", "short": "", "description": "" })
    );
}

#[tokio::test]
async fn invalid_create_body_is_400() {
    let app = TestApp::spawn().await;
    let cookie = app.sign_in(&user("alice")).await;

    let response = app
        .send(request(
            "POST",
            "/api/orgs",
            Some(&cookie),
            Some(json!({ "title": "   " })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["field"], "title");
}

// =============================================================================
// Membership workflow
// =============================================================================

#[tokio::test]
async fn join_request_confirm_flow() {
    let app = TestApp::spawn().await;
    let program = seed(&app, ResourceKind::Program, "owner", "Digital Academy").await;
    let owner = app.sign_in(&user("owner")).await;
    let applicant = app.sign_in(&user("bob")).await;

    let requested = app
        .get(&format!("/api/request/program/{}", program.id), Some(&applicant))
        .await;
    assert_eq!(requested.status, StatusCode::OK);
    assert_eq!(requested.json()["userIs"]["request"], true);

    let again = app
        .get(&format!("/api/request/program/{}", program.id), Some(&applicant))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let pending = app
        .get(&format!("/api/programs/requests/{}", program.id), Some(&owner))
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.json()[0]["userId"], "bob");

    let outsider = app
        .get(&format!("/api/programs/requests/{}", program.id), Some(&applicant))
        .await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);

    let confirmed = app
        .get(
            &format!("/api/programs/requests/confirm/{}/bob", program.id),
            Some(&owner),
        )
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.json()["member"]["userId"], "bob");

    let stored = app
        .resources
        .find(ResourceKind::Program, &program.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_member(&user("bob").id));
    assert!(stored.requests.is_empty());
}

#[tokio::test]
async fn request_review_routes_are_forbidden_to_guests_and_outsiders() {
    let app = TestApp::spawn().await;
    let mut program = seed(&app, ResourceKind::Program, "owner", "Digital Academy").await;
    program
        .request_membership(Member::from(&user("bob")))
        .unwrap();
    app.resources.save(&program).await.unwrap();
    let outsider = app.sign_in(&user("carol")).await;

    let uris = [
        format!("/api/programs/requests/{}", program.id),
        format!("/api/programs/requests/confirm/{}/bob", program.id),
        format!("/api/programs/requests/deny/{}/bob", program.id),
    ];
    for cookie in [None, Some(outsider.as_str())] {
        for uri in &uris {
            let response = app.get(uri, cookie).await;
            assert_eq!(response.status, StatusCode::FORBIDDEN, "{uri} as {cookie:?}");
            assert_eq!(response.json(), json!({ "message": "User is not authorized" }));
        }
    }

    let stored = app
        .resources
        .find(ResourceKind::Program, &program.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.has_pending_request(&user("bob").id));
    assert!(!stored.is_member(&user("bob").id));
}

#[tokio::test]
async fn deny_without_pending_request_is_422() {
    let app = TestApp::spawn().await;
    let org = seed(&app, ResourceKind::Org, "owner", "Acme").await;
    let owner = app.sign_in(&user("owner")).await;

    let response = app
        .get(
            &format!("/api/orgs/requests/deny/{}/nobody", org.id),
            Some(&owner),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn anonymous_join_request_is_401() {
    let app = TestApp::spawn().await;
    let org = seed(&app, ResourceKind::Org, "owner", "Acme").await;

    let response = app
        .get(&format!("/api/request/org/{}", org.id), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn join_request_route_is_absent_when_disabled() {
    let app = TestApp::spawn_with(
        |config| config.features.enable_join_requests = false,
        default_modules(),
    )
    .await
    .unwrap();
    let org = seed(&app, ResourceKind::Org, "owner", "Acme").await;
    let cookie = app.sign_in(&user("bob")).await;

    let response = app
        .get(&format!("/api/request/org/{}", org.id), Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "error": "Path not found" }));
}
