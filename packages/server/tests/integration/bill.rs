use chrono::Datelike;
use serde_json::json;

use crate::common::{TestApp, TestOptions, routes};
use server::config::BillingBackend;

async fn app_with(backend: BillingBackend) -> TestApp {
    TestApp::spawn_with(TestOptions {
        billing: backend,
        ..Default::default()
    })
    .await
}

/// Create, read, update, list and delete one bill.
async fn crud_round(app: &TestApp) {
    let created = app.create_bill("Rajesh Kumar", "operator-001").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["payment_mode"], "cash");
    assert!(created["updated_at"].is_null());

    let res = app.get(&routes::bill(&id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, created);

    let res = app
        .patch_json(&routes::bill(&id), &json!({"amount": 1400.0, "payment_mode": "upi"}))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["amount"], 1400.0);
    assert_eq!(res.body["payment_mode"], "upi");
    assert_eq!(res.body["farmer_name"], "Rajesh Kumar");
    assert!(res.body["updated_at"].is_string());

    let res = app.get(routes::BILLS).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let res = app.delete(&routes::bill(&id)).await;
    assert_eq!(res.status, 204);
    assert_eq!(app.get(&routes::bill(&id)).await.status, 404);
    assert_eq!(app.delete(&routes::bill(&id)).await.status, 404);
}

mod backends {
    use super::*;

    #[tokio::test]
    async fn in_memory_crud() {
        let app = app_with(BillingBackend::Memory).await;
        crud_round(&app).await;
    }

    #[tokio::test]
    async fn database_crud() {
        let app = app_with(BillingBackend::Database).await;
        crud_round(&app).await;
    }
}

mod numbering {
    use super::*;

    #[tokio::test]
    async fn numbers_are_generated_per_year() {
        let app = app_with(BillingBackend::Database).await;
        let year = chrono::Utc::now().year();

        let first = app.create_bill("Amit Singh", "operator-002").await;
        let second = app.create_bill("Priya Sharma", "operator-001").await;

        assert_eq!(first["bill_number"], format!("BILL-{year}-001"));
        assert_eq!(second["bill_number"], format!("BILL-{year}-002"));
    }

    #[tokio::test]
    async fn explicit_duplicate_number_conflicts() {
        for backend in [BillingBackend::Memory, BillingBackend::Database] {
            let app = app_with(backend).await;
            let body = json!({
                "bill_number": "BILL-2024-001",
                "farmer_name": "Vijay Reddy",
                "operator_id": "operator-002",
                "drone_id": "drone-02",
                "acres": 6.0,
                "duration_hours": 3.0,
                "amount": 1500.0,
                "payment_mode": "cash",
            });

            let res = app.post_json(routes::BILLS, &body).await;
            assert_eq!(res.status, 201, "{}", res.text);

            let res = app.post_json(routes::BILLS, &body).await;
            assert_eq!(res.status, 409, "{}", res.text);
            assert_eq!(res.body["code"], "CONFLICT");
        }
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn invalid_fields_are_unprocessable() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::BILLS,
                &json!({
                    "farmer_name": "",
                    "operator_id": "operator-001",
                    "drone_id": "drone-01",
                    "acres": -1.0,
                    "duration_hours": 2.0,
                    "amount": 0.0,
                    "payment_mode": "cash",
                }),
            )
            .await;

        assert_eq!(res.status, 422, "{}", res.text);
        assert_eq!(res.body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_payment_mode_is_a_bad_request() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::BILLS,
                &json!({
                    "farmer_name": "A",
                    "operator_id": "op",
                    "drone_id": "d",
                    "acres": 1.0,
                    "duration_hours": 1.0,
                    "amount": 1.0,
                    "payment_mode": "card",
                }),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.create_bill("Suresh Patel", "operator-001").await;
        let id = created["id"].as_str().unwrap();

        let res = app.patch_json(&routes::bill(id), &json!({})).await;
        assert_eq!(res.status, 400, "{}", res.text);
    }

    #[tokio::test]
    async fn out_of_range_limit_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&format!("{}?limit=0", routes::BILLS)).await;
        assert_eq!(res.status, 400);
        let res = app.get(&format!("{}?limit=201", routes::BILLS)).await;
        assert_eq!(res.status, 400);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn filters_and_paging() {
        for backend in [BillingBackend::Memory, BillingBackend::Database] {
            let app = app_with(backend).await;
            app.create_bill("Rajesh Kumar", "operator-001").await;
            app.create_bill("Suresh Patel", "operator-002").await;
            app.create_bill("Rajesh Verma", "operator-002").await;

            let res = app.get(&format!("{}?farmer_name=rajesh", routes::BILLS)).await;
            assert_eq!(res.body.as_array().unwrap().len(), 2);
            // Newest first.
            assert_eq!(res.body[0]["farmer_name"], "Rajesh Verma");

            let res = app
                .get(&format!(
                    "{}?operator_id=operator-002&farmer_name=RAJESH",
                    routes::BILLS
                ))
                .await;
            assert_eq!(res.body.as_array().unwrap().len(), 1);

            let res = app.get(&format!("{}?skip=1&limit=1", routes::BILLS)).await;
            assert_eq!(res.body.as_array().unwrap().len(), 1);
            assert_eq!(res.body[0]["farmer_name"], "Suresh Patel");
        }
    }

    #[tokio::test]
    async fn filters_by_drone() {
        for backend in [BillingBackend::Memory, BillingBackend::Database] {
            let app = app_with(backend).await;
            app.create_bill("Rajesh Kumar", "operator-001").await;
            let res = app
                .post_json(
                    routes::BILLS,
                    &json!({
                        "farmer_name": "Amit Singh",
                        "operator_id": "operator-001",
                        "drone_id": "drone-02",
                        "acres": 3.0,
                        "duration_hours": 1.5,
                        "amount": 750.0,
                        "payment_mode": "upi",
                    }),
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
            assert_eq!(res.body["drone_id"], "drone-02");

            let res = app.get(&format!("{}?drone_id=drone-02", routes::BILLS)).await;
            assert_eq!(res.body.as_array().unwrap().len(), 1);
            assert_eq!(res.body[0]["farmer_name"], "Amit Singh");

            let id = res.body[0]["id"].as_str().unwrap().to_string();
            let res = app
                .patch_json(&routes::bill(&id), &json!({"drone_id": "drone-01"}))
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
            let res = app.get(&format!("{}?drone_id=drone-01", routes::BILLS)).await;
            assert_eq!(res.body.as_array().unwrap().len(), 2);
        }
    }
}
