
use std::{
    sync::{atomic::{AtomicUsize, Ordering}, Arc},
    time::Duration,
};

use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn health_returns_ok() {
    let app = TestApp::spawn(MockSender::new()).await;

    let response = app.client
        .get(&format!("{}/health", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn valid_submission_returns_success_fragment() {
    let mut sender = MockSender::new();
    sender.expect_send()
        .withf(|n| n.subject == "Nuevo Contacto Web: Ana López" && n.text.contains("5512345678"))
        .times(1)
        .returning(|_| Ok(()));
    let app = TestApp::spawn(sender).await;

    let response = app.post_contact(&valid_form()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("hx-trigger").and_then(|v| v.to_str().ok()),
        Some("form-sent-successfully")
    );
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"class="success""#));
    assert!(body.contains("¡Mensaje enviado!"));

    let snapshot = app.state.guard().success_snapshot(&app.local_client());
    assert_eq!(snapshot.recent_count, 1);
}

#[actix_rt::test]
async fn unknown_service_is_rejected() {
    let mut sender = MockSender::new();
    sender.expect_send().never();
    let app = TestApp::spawn(sender).await;

    let response = app.post_contact(&form_with("servicio", "lavado-autos")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.contains("Error de validación:"));
    assert!(body.contains("Servicio no válido"));
}

#[actix_rt::test]
async fn first_violation_wins() {
    let app = TestApp::spawn(MockSender::new()).await;

    let mut form = form_with("nombre", "   ");
    form.retain(|(name, _)| *name != "servicio");

    let response = app.post_contact(&form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.contains("El nombre es requerido"));
    assert!(!body.contains("Servicio no válido"));
}

#[actix_rt::test]
async fn short_phone_is_rejected() {
    let app = TestApp::spawn(MockSender::new()).await;

    let response = app.post_contact(&form_with("telefono", "55 1234 567")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("10 dígitos"));
}

#[actix_rt::test]
async fn honeypot_looks_successful_and_touches_nothing() {
    let mut sender = MockSender::new();
    sender.expect_send().never();
    let app = TestApp::spawn(sender).await;

    let response = app.post_contact(&form_with("website_url", "http://spam.example")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("hx-trigger"));
    assert!(response.text().await.unwrap().contains("¡Mensaje enviado!"));

    let guard = app.state.guard();
    assert_eq!(guard.success_snapshot(&app.local_client()).recent_count, 0);
    assert_eq!(guard.consecutive_failures(&app.local_client()), 0);
}

#[actix_rt::test]
async fn repeated_failures_escalate_then_reset_on_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut sender = MockSender::new();
    sender.expect_send().times(4).returning(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 3 {
            Err(transport_failure())
        } else {
            Ok(())
        }
    });
    let app = TestApp::spawn(sender).await;

    let first = app.post_contact(&valid_form()).await;
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(first.text().await.unwrap().contains("(Intento 1/3)"));

    let second = app.post_contact(&valid_form()).await;
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(second.text().await.unwrap().contains("(Intento 2/3)"));

    let third = app.post_contact(&valid_form()).await;
    assert_eq!(third.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = third.text().await.unwrap();
    assert!(body.contains(r#"class="error permanent""#));
    assert!(body.contains("No fue posible enviar tu información."));
    assert!(!body.contains("Intento"));

    assert_eq!(app.state.guard().consecutive_failures(&app.local_client()), 3);

    let fourth = app.post_contact(&valid_form()).await;
    assert_eq!(fourth.status(), StatusCode::OK);
    assert_eq!(app.state.guard().consecutive_failures(&app.local_client()), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[actix_rt::test]
async fn request_past_the_cap_is_denied() {
    let app = TestApp::spawn(MockSender::new()).await;
    let invalid = form_with("servicio", "lavado-autos");

    for _ in 0..app.config.rate_limit_max_requests {
        let response = app.post_contact(&invalid).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let denied = app.post_contact(&invalid).await;

    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(denied.headers().contains_key("retry-after"));
}

#[actix_rt::test]
async fn cap_without_successes_gets_the_soft_message() {
    let app = TestApp::spawn(MockSender::new()).await;
    let invalid = form_with("telefono", "123");

    for _ in 0..app.config.rate_limit_max_requests {
        app.post_contact(&invalid).await;
    }

    let denied = app.post_contact(&valid_form()).await;

    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = denied.text().await.unwrap();
    assert!(body.contains(r#"class="info permanent""#));
    assert!(body.contains("Tus mensajes han sido enviados."));
}

#[actix_rt::test]
async fn clustered_successes_get_the_automated_message() {
    let mut config = test_config();
    config.rate_limit_max_requests = 3;
    let app = TestApp::spawn_with(config, always_ok_sender()).await;

    for _ in 0..3 {
        let response = app.post_contact(&valid_form()).await;
        assert_eq!(response.status(), StatusCode::OK);
        app.clock.advance(Duration::from_secs(5));
    }

    let denied = app.post_contact(&valid_form()).await;

    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = denied.text().await.unwrap();
    assert!(body.contains(r#"class="error permanent""#));
    assert!(body.contains("Demasiados intentos."));
    assert!(body.contains("espera 10 minutos"));
}

#[actix_rt::test]
async fn spread_out_successes_get_the_soft_message() {
    let mut config = test_config();
    config.rate_limit_max_requests = 3;
    let app = TestApp::spawn_with(config, always_ok_sender()).await;

    for _ in 0..3 {
        let response = app.post_contact(&valid_form()).await;
        assert_eq!(response.status(), StatusCode::OK);
        app.clock.advance(Duration::from_secs(20));
    }

    let denied = app.post_contact(&valid_form()).await;

    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(denied.text().await.unwrap().contains("Tus mensajes han sido enviados."));
}

#[actix_rt::test]
async fn new_window_admits_again() {
    let mut config = test_config();
    config.rate_limit_max_requests = 2;
    let app = TestApp::spawn_with(config, always_ok_sender()).await;

    app.post_contact(&valid_form()).await;
    app.post_contact(&valid_form()).await;
    let denied = app.post_contact(&valid_form()).await;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);

    app.clock.advance(Duration::from_secs(600));

    let admitted = app.post_contact(&valid_form()).await;
    assert_eq!(admitted.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn health_is_not_rate_limited() {
    let mut config = test_config();
    config.rate_limit_max_requests = 1;
    let app = TestApp::spawn_with(config, always_ok_sender()).await;

    app.post_contact(&valid_form()).await;
    assert_eq!(app.post_contact(&valid_form()).await.status(), StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..3 {
        let response = app.client
            .get(&format!("{}/health", app.address))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[actix_rt::test]
async fn non_form_payload_is_a_bad_request() {
    let mut sender = MockSender::new();
    sender.expect_send().never();
    let app = TestApp::spawn(sender).await;

    let response = app.client
        .post(&format!("{}/api/v1/contact", app.address))
        .header("content-type", "application/json")
        .body(r#"{"nombre":"Ana"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("Datos inválidos en el formulario."));
}

#[actix_rt::test]
async fn only_submissions_spend_admission_credits() {
    let mut config = test_config();
    config.rate_limit_max_requests = 2;
    let app = TestApp::spawn_with(config, always_ok_sender()).await;

    for _ in 0..5 {
        let wrong_method = app.client
            .get(&format!("{}/api/v1/contact", app.address))
            .send()
            .await
            .unwrap();
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);

        let unknown = app.client
            .post(&format!("{}/api/v1/unknown", app.address))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    assert_eq!(app.post_contact(&valid_form()).await.status(), StatusCode::OK);
    assert_eq!(app.post_contact(&valid_form()).await.status(), StatusCode::OK);
    assert_eq!(
        app.post_contact(&valid_form()).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_rt::test]
async fn fault_inside_submission_returns_system_error_fragment() {
    // Admission reads the clock once; the ledger update after dispatch panics
    let clock = ManualClock::failing_after(1);
    let app = TestApp::spawn_with_clock(test_config(), always_ok_sender(), clock).await;

    let response = app.post_contact(&valid_form()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.headers().contains_key("hx-trigger"));
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"class="error""#));
    assert!(body.contains("Error en el sistema."));
}
