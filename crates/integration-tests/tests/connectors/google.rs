use integration_tests::{TestRegistry, llms::GoogleMock};
use llm::{ChatMessage, ExtraOptions, GenerationParameters, Operation, ProviderFailure};

#[tokio::test]
async fn chat_maps_conversation_to_contents() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(GoogleMock::new("gemini").with_response("Hello", "Hi there!"))
        .await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    let conversation = [
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hi! What can I do for you?"),
        ChatMessage::user("Hello"),
    ];

    let params = GenerationParameters::default().with_temperature(0.5).with_max_tokens(100);
    let result = connector
        .chat(&conversation, &params, &ExtraOptions::default())
        .await
        .unwrap();

    insta::assert_json_snapshot!(result, @r#"
    {
      "content": "Hi there!",
      "candidates": [
        {
          "content": {
            "parts": [
              {
                "text": "Hi there!"
              }
            ],
            "role": "model"
          },
          "finishReason": "STOP",
          "index": 0
        }
      ],
      "modelVersion": "gemini-pro",
      "usageMetadata": {
        "candidatesTokenCount": 15,
        "promptTokenCount": 10,
        "totalTokenCount": 25
      }
    }
    "#);

    let request = test.requests("gemini").last().unwrap();

    assert_eq!(
        request.uri,
        "/v1beta/models/gemini-pro:generateContent?key=test-google-key"
    );

    insta::assert_json_snapshot!(request.body, @r#"
    {
      "contents": [
        {
          "parts": [
            {
              "text": "Hi"
            }
          ],
          "role": "user"
        },
        {
          "parts": [
            {
              "text": "Hi! What can I do for you?"
            }
          ],
          "role": "model"
        },
        {
          "parts": [
            {
              "text": "Hello"
            }
          ],
          "role": "user"
        }
      ],
      "generationConfig": {
        "maxOutputTokens": 100,
        "temperature": 0.5
      },
      "systemInstruction": {
        "parts": [
          {
            "text": "You are a helpful assistant."
          }
        ]
      }
    }
    "#);
}

#[tokio::test]
async fn generate_text_returns_bare_string() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(GoogleMock::new("gemini").with_response("Write a test", "This is a test response"))
        .await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    let text = connector
        .generate_text("Write a test", &GenerationParameters::default(), &ExtraOptions::default())
        .await
        .unwrap();

    assert_eq!(text, "This is a test response");
    assert_eq!(test.requests("gemini").count(), 1);
}

#[tokio::test]
async fn embeddings_never_reach_the_network() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(GoogleMock::new("gemini")).await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    assert!(!connector.capabilities().embeddings);

    let error = connector
        .get_embeddings("Some text", &ExtraOptions::default())
        .await
        .unwrap_err();

    assert!(error.is_not_available());
    assert_eq!(error.operation(), Some(Operation::GetEmbeddings));
    insta::assert_snapshot!(error, @"Google Gemini API integration is not available (get_embeddings)");

    assert_eq!(test.requests("gemini").count(), 0);
}

#[tokio::test]
async fn model_override_and_generation_fields() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(GoogleMock::new("gemini")).await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    let extra = ExtraOptions::default()
        .with_model("gemini-1.5-flash")
        .with_field("topK", 40)
        .with_field("temperature", 2);

    let result = connector
        .chat(&[ChatMessage::user("Hi")], &GenerationParameters::default().with_temperature(0.5), &extra)
        .await
        .unwrap();

    assert_eq!(
        result.extra("modelVersion").and_then(|version| version.as_str()),
        Some("gemini-1.5-flash")
    );

    let request = test.requests("gemini").last().unwrap();

    assert_eq!(
        request.uri,
        "/v1beta/models/gemini-1.5-flash:generateContent?key=test-google-key"
    );

    insta::assert_json_snapshot!(request.body["generationConfig"], @r#"
    {
      "temperature": 0.5,
      "topK": 40
    }
    "#);
}

#[tokio::test]
async fn blocked_prompt_is_empty_response() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(GoogleMock::new("gemini").with_blocked_prompt()).await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    let error = connector
        .generate_text("Something unsafe", &GenerationParameters::default(), &ExtraOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(error.failure(), Some(ProviderFailure::EmptyResponse)));
    assert_eq!(error.operation(), Some(Operation::GenerateText));
}

#[tokio::test]
async fn error_status_is_mapped() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(GoogleMock::new("gemini").with_rate_limit("Resource has been exhausted"))
        .await;

    let test = builder.build("");
    let connector = test.connector("gemini");

    let error = connector
        .chat(
            &[ChatMessage::user("Hi")],
            &GenerationParameters::default(),
            &ExtraOptions::default(),
        )
        .await
        .unwrap_err();

    insta::assert_snapshot!(error, @r#"gemini chat failed: Rate limit exceeded: {"error":{"code":429,"message":"Resource has been exhausted","status":"Too Many Requests"}}"#);
    assert_eq!(error.failure().and_then(ProviderFailure::status), Some(429));
}
