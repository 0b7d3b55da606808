use indoc::formatdoc;
use integration_tests::{TestRegistry, llms::OpenAIMock};
use llm::{ChatMessage, Connector, ExtraOptions, GenerationParameters, OpenAIConnector};
use secrecy::SecretString;
use url::Url;

#[tokio::test]
async fn chat_returns_top_choice() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(OpenAIMock::new("openai").with_response("Hello", "Hi there!"))
        .await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let result = connector
        .chat(
            &[ChatMessage::user("Hello")],
            &GenerationParameters::default(),
            &ExtraOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.content(), "Hi there!");

    insta::assert_json_snapshot!(result, @r#"
    {
      "content": "Hi there!",
      "choices": [
        {
          "finish_reason": "stop",
          "index": 0,
          "message": {
            "content": "Hi there!",
            "role": "assistant"
          }
        }
      ],
      "created": 1677651200,
      "id": "chatcmpl-test",
      "model": "gpt-3.5-turbo",
      "object": "chat.completion",
      "usage": {
        "completion_tokens": 15,
        "prompt_tokens": 10,
        "total_tokens": 25
      }
    }
    "#);

    let request = test.requests("openai").last().unwrap();

    assert_eq!(request.uri, "/v1/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request.organization, None);
}

#[tokio::test]
async fn generate_text_returns_bare_string() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(OpenAIMock::new("openai").with_response("Write a test", "This is a test response"))
        .await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let text = connector
        .generate_text("Write a test", &GenerationParameters::default(), &ExtraOptions::default())
        .await
        .unwrap();

    assert_eq!(text, "This is a test response");
}

#[tokio::test]
async fn generate_text_matches_single_user_chat() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let params = GenerationParameters::default().with_temperature(0.5).with_max_tokens(32);
    let extra = ExtraOptions::default();

    let text = connector.generate_text("Tell me a joke", &params, &extra).await.unwrap();
    let generate_body = test.requests("openai").last_body();

    let chat = connector
        .chat(&[ChatMessage::user("Tell me a joke")], &params, &extra)
        .await
        .unwrap();
    let chat_body = test.requests("openai").last_body();

    assert_eq!(text, chat.content());
    assert_eq!(generate_body, chat_body);

    insta::assert_json_snapshot!(chat_body, @r#"
    {
      "max_tokens": 32,
      "messages": [
        {
          "content": "Tell me a joke",
          "role": "user"
        }
      ],
      "model": "gpt-3.5-turbo",
      "stream": false,
      "temperature": 0.5
    }
    "#);
}

#[tokio::test]
async fn full_conversation_is_sent_in_order() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let conversation = [
        ChatMessage::system("You are terse."),
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hello."),
        ChatMessage::user("What is Rust?"),
    ];

    connector
        .chat(&conversation, &GenerationParameters::default(), &ExtraOptions::default())
        .await
        .unwrap();

    let body = test.requests("openai").last_body();

    insta::assert_json_snapshot!(body["messages"], @r#"
    [
      {
        "content": "You are terse.",
        "role": "system"
      },
      {
        "content": "Hi",
        "role": "user"
      },
      {
        "content": "Hello.",
        "role": "assistant"
      },
      {
        "content": "What is Rust?",
        "role": "user"
      }
    ]
    "#);
}

#[tokio::test]
async fn configured_model_organization_and_extra_fields() {
    let mut builder = TestRegistry::builder();
    let mock = builder.spawn_llm(OpenAIMock::new("openai")).await;
    let (address, requests) = (mock.address, mock.requests.clone());

    // Configured by hand instead of through the builder, to set every OpenAI option.
    let test = TestRegistry::builder().build(&formatdoc! {r#"
        [providers.openai]
        type = "openai"
        api_key = "sk-test"
        base_url = "http://{}/v1"
        model = "gpt-4o-mini"
        organization = "org-123"

        [providers.openai.extra]
        user = "batch-job"
        seed = 7
    "#, address});

    let extra = ExtraOptions::default()
        .with_field("seed", 42)
        .with_field("model", "ignored-model");

    test.connector("openai")
        .chat(
            &[ChatMessage::user("Hi")],
            &GenerationParameters::default().with_temperature(0.5),
            &extra,
        )
        .await
        .unwrap();

    let request = requests.last().unwrap();

    assert_eq!(request.organization.as_deref(), Some("org-123"));

    insta::assert_json_snapshot!(request.body, @r#"
    {
      "messages": [
        {
          "content": "Hi",
          "role": "user"
        }
      ],
      "model": "gpt-4o-mini",
      "seed": 42,
      "stream": false,
      "temperature": 0.5,
      "user": "batch-job"
    }
    "#);
}

#[tokio::test]
async fn per_call_model_override() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let result = connector
        .chat(
            &[ChatMessage::user("Hi")],
            &GenerationParameters::default(),
            &ExtraOptions::default().with_model("gpt-4o"),
        )
        .await
        .unwrap();

    assert_eq!(result.extra("model").and_then(|model| model.as_str()), Some("gpt-4o"));
    assert_eq!(test.requests("openai").last_body()["model"], "gpt-4o");
}

#[tokio::test]
async fn embeddings_use_embedding_model() {
    let mut builder = TestRegistry::builder();
    builder
        .spawn_llm(OpenAIMock::new("openai").with_embedding(vec![0.5, -0.25, 0.125]))
        .await;

    let test = builder.build("");
    let connector = test.connector("openai");

    let embedding = connector
        .get_embeddings("The quick brown fox", &ExtraOptions::default())
        .await
        .unwrap();

    assert_eq!(embedding, vec![0.5_f32, -0.25, 0.125]);

    let request = test.requests("openai").last().unwrap();

    assert_eq!(request.uri, "/v1/embeddings");

    insta::assert_json_snapshot!(request.body, @r#"
    {
      "input": "The quick brown fox",
      "model": "text-embedding-ada-002"
    }
    "#);
}

#[tokio::test]
async fn constructed_directly() {
    let mut builder = TestRegistry::builder();
    let base_url = builder
        .spawn_llm(OpenAIMock::new("openai").with_response("Hello", "Hi there!"))
        .await
        .base_url();

    let config = config::OpenAiConfig {
        base_url: Some(Url::parse(&base_url).unwrap()),
        ..Default::default()
    };

    let connector = OpenAIConnector::new("direct", SecretString::from("sk-test"), config).unwrap();

    let result = connector
        .chat(
            &[ChatMessage::user("Hello")],
            &GenerationParameters::default(),
            &ExtraOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(connector.name(), "direct");
    assert_eq!(result.content(), "Hi there!");
}
