use indoc::indoc;
use integration_tests::{
    TestRegistry,
    llms::{GoogleMock, OpenAIMock},
};
use llm::{ChatMessage, ExtraOptions, GenerationParameters, LlmError, Registry};

#[tokio::test]
async fn lists_providers_with_capabilities() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;
    builder.spawn_llm(GoogleMock::new("gemini")).await;

    let test = builder.build(indoc! {r#"
        [providers.deepseek]
        type = "deepseek"
    "#});

    let providers = test
        .registry
        .providers()
        .map(|entry| {
            serde_json::json!({
                "name": entry.name,
                "type": entry.provider_type.as_str(),
                "capabilities": entry.capabilities,
            })
        })
        .collect::<Vec<_>>();

    insta::assert_json_snapshot!(providers, @r#"
    [
      {
        "capabilities": {
          "chat": false,
          "embeddings": false,
          "generate_text": false
        },
        "name": "deepseek",
        "type": "deepseek"
      },
      {
        "capabilities": {
          "chat": true,
          "embeddings": false,
          "generate_text": true
        },
        "name": "gemini",
        "type": "google"
      },
      {
        "capabilities": {
          "chat": true,
          "embeddings": true,
          "generate_text": true
        },
        "name": "openai",
        "type": "openai"
      }
    ]
    "#);
}

#[tokio::test]
async fn configured_defaults_feed_generation_parameters() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;

    let test = builder.build(indoc! {r#"
        [defaults]
        temperature = 0.25
        max_tokens = 256
    "#});

    let params = GenerationParameters::from(test.registry.defaults());

    test.connector("openai")
        .chat(&[ChatMessage::user("Hi")], &params, &ExtraOptions::default())
        .await
        .unwrap();

    let body = test.requests("openai").last_body();

    assert_eq!(body["temperature"], 0.25);
    assert_eq!(body["max_tokens"], 256);
}

#[test]
fn unknown_provider_is_not_found() {
    let registry = Registry::from_config(&config::Config::default()).unwrap();

    let Err(error) = registry.get("openai") else {
        unreachable!("nothing is configured");
    };

    assert!(matches!(error, LlmError::ProviderNotFound(ref name) if name == "openai"));
    assert!(registry.capabilities("openai").is_err());
}

#[test]
fn working_provider_without_key_fails() {
    let config: config::Config = toml::from_str(indoc! {r#"
        [providers.gemini]
        type = "google"
    "#})
    .unwrap();

    let Err(error) = Registry::from_config(&config) else {
        unreachable!("no key source configured");
    };

    insta::assert_snapshot!(error, @"Configuration error: provider 'gemini': no API key configured for google provider: set `api_key` or `api_key_env`");
}
