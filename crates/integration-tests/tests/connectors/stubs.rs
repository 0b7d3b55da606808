use config::UnavailableConfig;
use indoc::indoc;
use integration_tests::{TestRegistry, llms::OpenAIMock};
use llm::{Capabilities, ChatMessage, ExtraOptions, GenerationParameters, LlmError, Operation, UnavailableConnector};
use secrecy::SecretString;

#[test]
fn construction_fails_with_any_key() {
    for key in ["", "sk-real-looking-key", "test-key"] {
        let copilot = UnavailableConnector::copilot("copilot", SecretString::from(key), UnavailableConfig::default());
        let deepseek = UnavailableConnector::deepseek("deepseek", SecretString::from(key), UnavailableConfig::default());

        for result in [copilot, deepseek] {
            let error = result.unwrap_err();

            assert!(error.is_not_available());
            assert_eq!(error.operation(), Some(Operation::Construct));
        }
    }
}

#[test]
fn construction_error_names_the_provider() {
    let error = UnavailableConnector::copilot("copilot", SecretString::from("key"), UnavailableConfig::default())
        .unwrap_err();

    insta::assert_snapshot!(error, @"Microsoft Copilot API integration is not available (construct)");
}

#[tokio::test]
async fn declared_stubs_fail_every_call_without_requests() {
    let mut builder = TestRegistry::builder();
    builder.spawn_llm(OpenAIMock::new("openai")).await;

    let test = builder.build(indoc! {r#"
        [providers.copilot]
        type = "copilot"
        api_key = "unused"

        [providers.deepseek]
        type = "deepseek"
        api_key_env = "DEEPSEEK_KEY_THAT_IS_NEVER_READ"
    "#});

    let params = GenerationParameters::default();
    let extra = ExtraOptions::default();
    let conversation = [ChatMessage::user("Hello")];

    let mut errors = Vec::new();

    for name in ["copilot", "deepseek"] {
        let connector = test.connector(name);

        assert_eq!(connector.capabilities(), Capabilities::NONE);
        assert_eq!(test.registry.capabilities(name).unwrap(), Capabilities::NONE);

        errors.push(connector.chat(&conversation, &params, &extra).await.unwrap_err());
        errors.push(connector.generate_text("Hello", &params, &extra).await.unwrap_err());
        errors.push(connector.get_embeddings("Hello", &extra).await.unwrap_err());
    }

    let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();

    insta::assert_debug_snapshot!(messages, @r#"
    [
        "Microsoft Copilot API integration is not available (chat)",
        "Microsoft Copilot API integration is not available (generate_text)",
        "Microsoft Copilot API integration is not available (get_embeddings)",
        "DeepSeek API integration is not available (chat)",
        "DeepSeek API integration is not available (generate_text)",
        "DeepSeek API integration is not available (get_embeddings)",
    ]
    "#);

    assert!(errors.iter().all(LlmError::is_not_available));
    assert_eq!(test.requests("openai").count(), 0);
}

#[test]
fn static_capabilities_need_no_connector() {
    assert_eq!(Capabilities::of(config::ProviderType::Copilot), Capabilities::NONE);
    assert_eq!(Capabilities::of(config::ProviderType::Deepseek), Capabilities::NONE);
    assert!(!Capabilities::of(config::ProviderType::Google).supports(Operation::GetEmbeddings));
}
