use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use wardflow_api::app::{build_app, services::AppServices};
use wardflow_api::config::AppConfig;
use wardflow_credentials::CredentialPolicy;
use wardflow_infra::{
    BcryptHasher, InMemoryDoctorStore, InMemoryHospitalStore, InMemoryPatientStore,
    InMemoryReservationStore, Notifier,
};
use wardflow_scheduling::FeeSchedule;

// ─────────────────────────────────────────────────────────────────────────────
// Harness
// ─────────────────────────────────────────────────────────────────────────────

/// Captured notification (the mail body surrogate).
#[derive(Debug, Clone)]
enum Mail {
    DoctorWelcome { email: String, password: String },
    PatientWelcome { email: String, token: String },
    ResetRequested { email: String, token: String },
    ResetCompleted { email: String },
}

#[derive(Default)]
struct CapturingNotifier {
    mails: Mutex<Vec<Mail>>,
}

impl CapturingNotifier {
    fn all(&self) -> Vec<Mail> {
        self.mails.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn doctor_welcome(
        &self,
        email: &str,
        _full_name: &str,
        system_password: &str,
    ) -> anyhow::Result<()> {
        self.mails.lock().unwrap().push(Mail::DoctorWelcome {
            email: email.to_string(),
            password: system_password.to_string(),
        });
        Ok(())
    }

    async fn patient_welcome(
        &self,
        email: &str,
        _full_name: &str,
        verify_token: &str,
    ) -> anyhow::Result<()> {
        self.mails.lock().unwrap().push(Mail::PatientWelcome {
            email: email.to_string(),
            token: verify_token.to_string(),
        });
        Ok(())
    }

    async fn password_reset_requested(
        &self,
        email: &str,
        _full_name: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        self.mails.lock().unwrap().push(Mail::ResetRequested {
            email: email.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn password_reset_completed(&self, email: &str, _full_name: &str) -> anyhow::Result<()> {
        self.mails.lock().unwrap().push(Mail::ResetCompleted {
            email: email.to_string(),
        });
        Ok(())
    }
}

struct TestServer {
    base_url: String,
    notifier: Arc<CapturingNotifier>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let cfg = AppConfig {
            port: 0,
            jwt_secret: "test-secret".to_string(),
            token_ttl: ChronoDuration::hours(1),
            fees: FeeSchedule::new(2000, 3),
            credentials: CredentialPolicy::default(),
            database_url: None,
        };

        let notifier = Arc::new(CapturingNotifier::default());
        let services = AppServices::assemble(
            Arc::new(InMemoryHospitalStore::new()),
            Arc::new(InMemoryDoctorStore::new()),
            Arc::new(InMemoryPatientStore::new()),
            Arc::new(InMemoryReservationStore::new()),
            // Minimum bcrypt cost keeps the suite fast.
            Arc::new(BcryptHasher::with_cost(4)),
            notifier.clone(),
            &cfg,
        );

        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}/api/v1");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            notifier,
            handle,
        }
    }

    /// Notifications are dispatched after the response commits; poll briefly.
    async fn wait_for_mail<T>(&self, pick: impl Fn(&[Mail]) -> Option<T>) -> T {
        for _ in 0..100 {
            if let Some(found) = pick(&self.notifier.all()) {
                return found;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("expected notification did not arrive within timeout");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> (StatusCode, Value) {
    let res = client.post(url).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn register_admin(client: &reqwest::Client, srv: &TestServer) -> String {
    let (status, _) = post_json(
        client,
        format!("{}/hospital/create", srv.base_url),
        json!({
            "name": "St. Vincents",
            "email": "admin@stvincents.org",
            "phone": "08030000001",
            "owner": "V. Holdings",
            "address": "12 Harbor Rd",
            "username": "stvincents",
            "password": "admin-pass",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        client,
        format!("{}/hospital/login", srv.base_url),
        json!({ "email": "admin@stvincents.org", "password": "admin-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["access_token"].as_str().unwrap().to_string()
}

fn doctor_body(email: &str, phone: &str, consultant: bool) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Okafor",
        "email": email,
        "phone": phone,
        "DOB": "1986-04-12",
        "is_consultant": consultant,
        "unit": "Surgery",
    })
}

/// Create a doctor via the admin surface and rotate its system password so
/// it becomes active. Returns (doctor_id, new_password).
async fn create_active_doctor(
    client: &reqwest::Client,
    srv: &TestServer,
    admin_token: &str,
    email: &str,
    phone: &str,
    consultant: bool,
) -> (String, String) {
    let res = client
        .post(format!("{}/doctor/create", srv.base_url))
        .bearer_auth(admin_token)
        .json(&doctor_body(email, phone, consultant))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let doctor_id = body["data"]["id"].as_str().unwrap().to_string();

    let mail_email = email.to_string();
    let system_password = srv
        .wait_for_mail(|mails| {
            mails.iter().find_map(|m| match m {
                Mail::DoctorWelcome { email, password } if *email == mail_email => {
                    Some(password.clone())
                }
                _ => None,
            })
        })
        .await;

    let res = client
        .patch(format!("{}/doctor/reset-sys-generated-password", srv.base_url))
        .json(&json!({
            "id": doctor_id,
            "old_password": system_password,
            "password": "doctor-pass",
            "confirm_password": "doctor-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    (doctor_id, "doctor-pass".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Hospital
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn hospital_registration_is_unique_per_field() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let body = json!({
        "name": "General",
        "email": "gen@w.test",
        "phone": "08030000001",
        "owner": "Owner",
        "address": "12 Harbor Rd",
        "username": "general",
        "password": "secret1",
    });

    let (status, _) = post_json(&client, format!("{}/hospital/create", srv.base_url), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same email, different everything else.
    let mut dup = body.clone();
    dup["phone"] = json!("08030000099");
    dup["username"] = json!("other");
    let (status, res) = post_json(&client, format!("{}/hospital/create", srv.base_url), dup).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["success"], json!(false));
    assert!(res["message"].as_str().unwrap().contains("email"));

    // Same username only.
    let mut dup = body.clone();
    dup["email"] = json!("other@w.test");
    dup["phone"] = json!("08030000099");
    let (status, res) = post_json(&client, format!("{}/hospital/create", srv.base_url), dup).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(res["message"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn hospital_login_issues_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_admin(&client, &srv).await;
    assert!(!token.is_empty());

    // Wrong password is a 400, not a 401: bad credentials are a domain rule.
    let (status, body) = post_json(
        &client,
        format!("{}/hospital/login", srv.base_url),
        json!({ "email": "admin@stvincents.org", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid credentials"));
}

#[tokio::test]
async fn malformed_hospital_body_is_unprocessable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{}/hospital/create", srv.base_url),
        json!({
            "name": "General",
            "email": "not-an-email",
            "phone": "08030000001",
            "owner": "Owner",
            "address": "12 Harbor Rd",
            "username": "general",
            "password": "secret1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("email"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Doctor
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn doctor_creation_requires_admin_bearer_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/doctor/create", srv.base_url))
        .json(&doctor_body("ada@w.test", "08030000002", false))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/doctor/create", srv.base_url))
        .bearer_auth("garbage-token")
        .json(&doctor_body("ada@w.test", "08030000002", false))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn doctor_cannot_login_until_rotation_and_rotation_is_one_way() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = register_admin(&client, &srv).await;

    let res = client
        .post(format!("{}/doctor/create", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&doctor_body("ada@w.test", "08030000002", false))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let doctor_id = body["data"]["id"].as_str().unwrap().to_string();
    // Secrets never appear in summaries.
    assert!(body["data"].get("password").is_none());

    let system_password = srv
        .wait_for_mail(|mails| {
            mails.iter().find_map(|m| match m {
                Mail::DoctorWelcome { password, .. } => Some(password.clone()),
                _ => None,
            })
        })
        .await;

    // Correct system password, but rotation has not happened yet.
    let (status, body) = post_json(
        &client,
        format!("{}/doctor/login", srv.base_url),
        json!({ "email": "ada@w.test", "password": system_password }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("system generated"));

    // Wrong old password is refused.
    let res = client
        .patch(format!("{}/doctor/reset-sys-generated-password", srv.base_url))
        .json(&json!({
            "id": doctor_id,
            "old_password": "guess",
            "password": "doctor-pass",
            "confirm_password": "doctor-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Correct rotation succeeds once...
    let res = client
        .patch(format!("{}/doctor/reset-sys-generated-password", srv.base_url))
        .json(&json!({
            "id": doctor_id,
            "old_password": system_password,
            "password": "doctor-pass",
            "confirm_password": "doctor-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["redirect"], json!(true));

    // ...and only once, even with the (former) system password.
    let res = client
        .patch(format!("{}/doctor/reset-sys-generated-password", srv.base_url))
        .json(&json!({
            "id": doctor_id,
            "old_password": system_password,
            "password": "another-pass",
            "confirm_password": "another-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // The retired system password no longer logs in; the new one does.
    let (status, _) = post_json(
        &client,
        format!("{}/doctor/login", srv.base_url),
        json!({ "email": "ada@w.test", "password": system_password }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &client,
        format!("{}/doctor/login", srv.base_url),
        json!({ "email": "ada@w.test", "password": "doctor-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn rotating_an_unknown_doctor_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/doctor/reset-sys-generated-password", srv.base_url))
        .json(&json!({
            "id": uuid::Uuid::now_v7().to_string(),
            "old_password": "whatever",
            "password": "doctor-pass",
            "confirm_password": "doctor-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// Patient
// ─────────────────────────────────────────────────────────────────────────────

fn patient_body(email: &str, phone: &str) -> Value {
    json!({
        "first_name": "Bola",
        "last_name": "Adeyemi",
        "email": email,
        "phone": phone,
        "DOB": "1994-09-30",
        "blood_group": "0+",
        "genotype": "AS",
        "password": "patient-pass",
        "confirm_password": "patient-pass",
    })
}

#[tokio::test]
async fn patient_verification_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = post_json(
        &client,
        format!("{}/patient/create", srv.base_url),
        patient_body("bola@w.test", "08030000003"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_verified"], json!(false));
    assert_eq!(body["data"]["blood_group"], json!("0+"));

    let verify_token = srv
        .wait_for_mail(|mails| {
            mails.iter().find_map(|m| match m {
                Mail::PatientWelcome { token, .. } => Some(token.clone()),
                _ => None,
            })
        })
        .await;

    // A wrong code is refused and does not consume the token.
    let wrong = if verify_token == "000000" { "000001" } else { "000000" };
    let (status, body) = post_json(
        &client,
        format!("{}/patient/verify-account", srv.base_url),
        json!({ "email": "bola@w.test", "token": wrong }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid token"));

    let (status, _) = post_json(
        &client,
        format!("{}/patient/verify-account", srv.base_url),
        json!({ "email": "bola@w.test", "token": verify_token }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Verifying twice reports the already-verified rule.
    let (status, body) = post_json(
        &client,
        format!("{}/patient/verify-account", srv.base_url),
        json!({ "email": "bola@w.test", "token": verify_token }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already verified"));
}

#[tokio::test]
async fn password_reset_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    post_json(
        &client,
        format!("{}/patient/create", srv.base_url),
        patient_body("bola@w.test", "08030000003"),
    )
    .await;

    // Unknown email is a 404.
    let (status, _) = post_json(
        &client,
        format!("{}/patient/forgot-password", srv.base_url),
        json!({ "email": "nobody@w.test" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(
        &client,
        format!("{}/patient/forgot-password", srv.base_url),
        json!({ "email": "bola@w.test" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reset_token = srv
        .wait_for_mail(|mails| {
            mails.iter().find_map(|m| match m {
                Mail::ResetRequested { token, .. } => Some(token.clone()),
                _ => None,
            })
        })
        .await;

    let (status, _) = post_json(
        &client,
        format!("{}/patient/reset-password", srv.base_url),
        json!({
            "email": "bola@w.test",
            "token": reset_token,
            "password": "new-patient-pass",
            "confirm_password": "new-patient-pass",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Completion mail goes out.
    srv.wait_for_mail(|mails| {
        mails.iter().find_map(|m| match m {
            Mail::ResetCompleted { email } if email == "bola@w.test" => Some(()),
            _ => None,
        })
    })
    .await;

    // Old password is dead, new one works.
    let (status, _) = post_json(
        &client,
        format!("{}/patient/login", srv.base_url),
        json!({ "email": "bola@w.test", "password": "patient-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &client,
        format!("{}/patient/login", srv.base_url),
        json!({ "email": "bola@w.test", "password": "new-patient-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());

    // The consumed token cannot be replayed.
    let (status, _) = post_json(
        &client,
        format!("{}/patient/reset-password", srv.base_url),
        json!({
            "email": "bola@w.test",
            "token": reset_token,
            "password": "sneaky-pass",
            "confirm_password": "sneaky-pass",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// Reservation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_conflicts_and_fees() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = register_admin(&client, &srv).await;

    let (doctor_id, _) = create_active_doctor(
        &client,
        &srv,
        &admin_token,
        "ada@w.test",
        "08030000002",
        true, // consultant: fee = 2000 * 3
    )
    .await;

    let (status, body) = post_json(
        &client,
        format!("{}/patient/create", srv.base_url),
        patient_body("bola@w.test", "08030000003"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let patient_id = body["data"]["id"].as_str().unwrap().to_string();

    let tomorrow = (Utc::now() + ChronoDuration::days(1)).date_naive().to_string();
    let booking = json!({
        "date": tomorrow,
        "time": "09:00",
        "doctor": doctor_id,
        "patient": patient_id,
    });

    let (status, body) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        booking.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["fee"], json!(6000));
    assert_eq!(body["reservation"]["reservation_status"], json!("pending"));
    assert_eq!(body["reservation"]["fee_status"], json!("unpaid"));

    // The identical slot books exactly once.
    let (status, body) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        booking,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("appointment"));

    // A different time for the same doctor is fine.
    let (status, _) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        json!({
            "date": tomorrow,
            "time": "10:00",
            "doctor": doctor_id,
            "patient": patient_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Non-consultants bill the base fee.
    let (plain_doctor, _) = create_active_doctor(
        &client,
        &srv,
        &admin_token,
        "chi@w.test",
        "08030000005",
        false,
    )
    .await;
    let (status, body) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        json!({
            "date": tomorrow,
            "time": "09:00",
            "doctor": plain_doctor,
            "patient": patient_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["fee"], json!(2000));
}

#[tokio::test]
async fn booking_rejects_short_lead_time_and_bad_doctors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin_token = register_admin(&client, &srv).await;

    let (status, body) = post_json(
        &client,
        format!("{}/patient/create", srv.base_url),
        patient_body("bola@w.test", "08030000003"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let patient_id = body["data"]["id"].as_str().unwrap().to_string();

    // Less than 30 minutes out fails even though the doctor id is bogus.
    let soon = Utc::now() + ChronoDuration::minutes(10);
    let (status, body) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        json!({
            "date": soon.format("%Y-%m-%d").to_string(),
            "time": soon.format("%H:%M").to_string(),
            "doctor": uuid::Uuid::now_v7().to_string(),
            "patient": patient_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("30 minutes"));

    let tomorrow = (Utc::now() + ChronoDuration::days(1)).date_naive().to_string();

    // Unknown doctor, valid lead time.
    let (status, _) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        json!({
            "date": tomorrow,
            "time": "09:00",
            "doctor": uuid::Uuid::now_v7().to_string(),
            "patient": patient_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A doctor that never rotated its system password is inactive.
    let res = client
        .post(format!("{}/doctor/create", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&doctor_body("idle@w.test", "08030000004", false))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let idle_doctor = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &client,
        format!("{}/reservation/create", srv.base_url),
        json!({
            "date": tomorrow,
            "time": "09:00",
            "doctor": idle_doctor,
            "patient": patient_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not active"));
}
