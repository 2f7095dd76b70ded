//! Update engine over the Cloud Storage adapter, against a mock server.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use timealign_core::{codec, PollDocumentStore, PollUpdateEngine, VersionedStore};
use timealign_domain::{
    Participant, ParticipantId, Poll, PollId, SlotId, StoreConfig, TimeAlignError, TimeSlot, Vote,
    VoteType,
};
use timealign_infra::{GcsObjectStore, StaticTokenProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBJECT_PATH: &str = "/storage/v1/b/team-polls/o/p1.json";
const UPLOAD_PATH: &str = "/upload/storage/v1/b/team-polls/o";

fn sample_poll() -> Poll {
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
    Poll {
        id: PollId::new("p1"),
        title: "Quarterly planning".into(),
        description: String::new(),
        location: None,
        created_at: (start - Duration::days(3)).into(),
        creator_name: "Dana".into(),
        slots: vec![TimeSlot::with_id(SlotId::new("s1"), start, start + Duration::hours(1)).unwrap()],
        participants: vec![],
    }
}

fn voter(name: &str, vote: VoteType) -> Participant {
    Participant {
        id: ParticipantId::new(format!("{}-id", name)),
        name: name.into(),
        votes: vec![Vote::new("s1", vote)],
    }
}

fn engine(server: &MockServer, token: Option<&str>) -> PollUpdateEngine {
    let config = StoreConfig::new("team-polls").with_base_url(server.uri());
    let tokens = Arc::new(StaticTokenProvider::new(token.map(str::to_string)));
    let objects = Arc::new(GcsObjectStore::new(config, tokens).unwrap());
    let store: Arc<dyn VersionedStore<Poll>> = Arc::new(PollDocumentStore::new(objects));
    PollUpdateEngine::new(store)
}

fn poll_response(poll: &Poll, generation: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("x-goog-generation", generation)
        .set_body_bytes(codec::encode(poll).unwrap())
}

#[tokio::test]
async fn vote_commits_against_read_generation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(poll_response(&sample_poll(), "7"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("name", "p1.json"))
        .and(query_param("ifGenerationMatch", "7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let committed = engine(&server, Some("tok"))
        .add_vote(&PollId::new("p1"), voter("Alice", VoteType::Yes))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(committed.participants.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let upload = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    let written = codec::decode(&upload.body).unwrap();
    assert_eq!(written, committed);
    assert_eq!(written.participants[0].name, "Alice");
}

#[tokio::test]
async fn repeated_precondition_failures_exhaust_after_three_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(poll_response(&sample_poll(), "7"))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(412))
        .expect(3)
        .mount(&server)
        .await;

    let result =
        engine(&server, Some("tok")).add_vote(&PollId::new("p1"), voter("Alice", VoteType::Yes)).await;

    assert_eq!(result, Err(TimeAlignError::Contention { attempts: 3 }));
}

#[tokio::test]
async fn conflict_then_success_rereads_fresh_generation() {
    let server = MockServer::start().await;
    let mut already_voted = sample_poll();
    already_voted.participants.push(voter("Bob", VoteType::No));

    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(poll_response(&sample_poll(), "7"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(poll_response(&already_voted, "8"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("ifGenerationMatch", "7"))
        .respond_with(ResponseTemplate::new(412))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("ifGenerationMatch", "8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let committed = engine(&server, Some("tok"))
        .add_vote(&PollId::new("p1"), voter("Alice", VoteType::Maybe))
        .await
        .unwrap()
        .unwrap();

    let names: Vec<_> = committed.participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
}

#[tokio::test]
async fn missing_poll_never_writes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OBJECT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let result =
        engine(&server, Some("tok")).add_vote(&PollId::new("p1"), voter("Alice", VoteType::Yes)).await;

    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn missing_token_fails_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let result = engine(&server, None).add_vote(&PollId::new("p1"), voter("Alice", VoteType::Yes)).await;

    assert!(matches!(result, Err(TimeAlignError::Auth(_))));
}

#[tokio::test]
async fn create_overwrites_without_precondition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "p1.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    engine(&server, Some("tok")).create_or_replace(&sample_poll()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "ifGenerationMatch"));
}
