use indoc::indoc;
use integration_tests::{
    TestRegistry,
    llms::{GoogleMock, OpenAIMock},
};
use llm::{ChatMessage, ExtraOptions, GenerationParameters};

mod google;
mod openai;
mod registry;
mod stubs;

#[tokio::test]
async fn multiple_providers_work_together() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(OpenAIMock::new("openai").with_response("Hello", "Hi there!"))
        .await;
    builder
        .spawn_llm(GoogleMock::new("gemini").with_response("Hello", "Hello from Gemini"))
        .await;

    let test = builder.build(indoc! {r#"
        [providers.copilot]
        type = "copilot"
    "#});

    let conversation = [ChatMessage::user("Hello")];
    let params = GenerationParameters::default();
    let extra = ExtraOptions::default();

    let openai = test.connector("openai");
    let gemini = test.connector("gemini");
    let copilot = test.connector("copilot");

    let (openai_result, gemini_result, copilot_result) = tokio::join!(
        openai.chat(&conversation, &params, &extra),
        gemini.chat(&conversation, &params, &extra),
        copilot.chat(&conversation, &params, &extra),
    );

    assert_eq!(openai_result.unwrap().content(), "Hi there!");
    assert_eq!(gemini_result.unwrap().content(), "Hello from Gemini");
    assert!(copilot_result.unwrap_err().is_not_available());

    assert_eq!(test.requests("openai").count(), 1);
    assert_eq!(test.requests("gemini").count(), 1);
}

#[tokio::test]
async fn one_connector_serves_concurrent_calls() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(
            OpenAIMock::new("openai")
                .with_response("first", "First answer")
                .with_response("second", "Second answer"),
        )
        .await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let params = GenerationParameters::default();
    let extra = ExtraOptions::default();

    let (first, second) = tokio::join!(
        connector.generate_text("the first question", &params, &extra),
        connector.generate_text("the second question", &params, &extra),
    );

    assert_eq!(first.unwrap(), "First answer");
    assert_eq!(second.unwrap(), "Second answer");
    assert_eq!(test.requests("openai").count(), 2);
}

#[test]
fn library_version() {
    assert_eq!(llm::VERSION, "0.1.0");
}
