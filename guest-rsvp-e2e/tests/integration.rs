use guest_rsvp_client::dashboard::DashboardStats;
use guest_rsvp_client::form::{FormEdit, FormStatus, SubmissionForm};
use guest_rsvp_client::{ClientError, GuestApi, HttpGuestApi};
use guest_rsvp_e2e::TestServer;
use guest_rsvp_model::{DayOfMonth, GuestSubmission, TimeSlot};

fn day(value: u8) -> DayOfMonth {
    DayOfMonth::new(value).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_store_lists_nothing() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url()).unwrap();

    assert!(api.list().await.unwrap().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn created_response_is_listed_with_generated_fields() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url()).unwrap();

    let submission = GuestSubmission {
        name: "Jeanne".to_owned(),
        allergies_and_diet: "sans lactose".to_owned(),
        needs_accommodation: true,
        available_days: vec![day(1), day(15)],
        available_time: vec![TimeSlot::Afternoon],
    };
    let created = api.create(&submission).await.unwrap();
    assert_eq!(created.submission(), submission);
    assert_eq!(created.created_at, created.updated_at);

    let listed = api.list().await.unwrap();
    assert_eq!(listed, vec![created]);

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn list_is_newest_first() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url()).unwrap();

    let mut ids = Vec::new();
    for name in ["premier", "deuxième", "troisième"] {
        let submission = GuestSubmission {
            name: name.to_owned(),
            ..GuestSubmission::default()
        };
        ids.push(api.create(&submission).await.unwrap().id);
    }
    ids.reverse();

    let listed: Vec<_> = api.list().await.unwrap().into_iter().map(|guest| guest.id).collect();
    assert_eq!(listed, ids);

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn form_flow_against_the_server() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url()).unwrap();

    let mut form = SubmissionForm::default();
    assert_eq!(form.submit(&api).await, FormStatus::EmptySubmission);
    assert!(api.list().await.unwrap().is_empty());

    form.apply(FormEdit::NeedsAccommodation(true));
    assert_eq!(form.submit(&api).await, FormStatus::Success);

    form.apply(FormEdit::ToggleDay(day(2)));
    form.apply(FormEdit::ToggleDay(day(1)));
    form.apply(FormEdit::ToggleTime(TimeSlot::Evening));
    assert_eq!(form.submit(&api).await, FormStatus::Success);

    let guests = api.list().await.unwrap();
    assert_eq!(guests.len(), 2);
    let oldest = &guests[1];
    assert!(oldest.needs_accommodation);
    assert_eq!(oldest.name, "");
    assert!(oldest.available_days.is_empty());

    let stats = DashboardStats::compute(&guests);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.day_counts, vec![(day(1), 1), (day(2), 1)]);
    assert_eq!(stats.time_counts, vec![(TimeSlot::Evening, 1)]);
    assert_eq!(stats.accommodation.needed, 1);

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn submitting_to_a_stopped_server_keeps_the_draft() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url()).unwrap();
    server.stop().await.unwrap();

    let mut form = SubmissionForm::default();
    form.apply(FormEdit::Name("Paul".to_owned()));
    assert_eq!(form.submit(&api).await, FormStatus::Error);
    assert_eq!(form.draft().name, "Paul");
}

#[tokio::test(flavor = "multi_thread")]
async fn https_url_against_a_plain_server_fails() {
    let server = TestServer::start().await.unwrap();
    let api = HttpGuestApi::new(&server.base_url().replacen("http://", "https://", 1)).unwrap();

    assert!(matches!(api.list().await, Err(ClientError::Io(_))));

    server.stop().await.unwrap();
}

mod raw_http {
    //! Requests the typed client cannot produce.

    use std::io::{Read as _, Write as _};
    use std::net::TcpStream;

    use super::*;

    fn exchange(base_url: &str, request: &str) -> String {
        let addr = base_url.trim_start_matches("http://");
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(request.as_bytes()).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn post(base_url: &str, body: &str) -> String {
        exchange(
            base_url,
            &format!(
                "POST /api/guests HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            ),
        )
    }

    fn body_of(response: &str) -> serde_json::Value {
        let (_, body) = response.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn out_of_range_day_is_rejected_and_not_stored() {
        let server = TestServer::start().await.unwrap();
        let base_url = server.base_url();

        let response = tokio::task::spawn_blocking(move || post(&base_url, r#"{"availableDays":[0]}"#))
            .await
            .unwrap();
        assert!(response.starts_with("HTTP/1.1 400"), "{response}");
        assert!(body_of(&response)["error"]
            .as_str()
            .unwrap()
            .contains("availableDays"));

        let api = HttpGuestApi::new(&server.base_url()).unwrap();
        assert!(api.list().await.unwrap().is_empty());

        server.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn loose_payloads_are_coerced() {
        let server = TestServer::start().await.unwrap();
        let base_url = server.base_url();

        let response = tokio::task::spawn_blocking(move || {
            post(
                &base_url,
                r#"{"name":42,"needsAccommodation":"yes","availableDays":"7","availableTime":"Soir"}"#,
            )
        })
        .await
        .unwrap();
        assert!(response.starts_with("HTTP/1.1 201"), "{response}");
        assert!(response
            .to_ascii_lowercase()
            .contains("access-control-allow-origin: *"));
        let body = body_of(&response);
        assert_eq!(body["name"], "42");
        assert_eq!(body["needsAccommodation"], true);
        assert_eq!(body["availableDays"], serde_json::json!([7]));
        assert_eq!(body["availableTime"], serde_json::json!(["Soir"]));

        server.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_errors_reach_the_client_as_status() {
        let server = TestServer::start().await.unwrap();
        let base_url = server.base_url();

        let response = tokio::task::spawn_blocking(move || post(&base_url, "{\"name\":"))
            .await
            .unwrap();
        assert!(response.starts_with("HTTP/1.1 400"), "{response}");

        // the typed client surfaces the server's message
        let api = HttpGuestApi::new(&format!("{}/api/unknown/", server.base_url())).unwrap();
        match api.list().await {
            Err(ClientError::Status { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected a 404, got {other:?}"),
        }

        server.stop().await.unwrap();
    }
}
