mod testsupport;

use kafka_rest::prelude::{
    ClientBuilder, ConsumerConfig, Error, Format, OffsetReset, ProduceRequest, Record,
    ResponseErrorKind,
};
use random_word::Lang;

#[tokio::test]
async fn it_can_list_topics_and_brokers() -> Result<(), Box<Error>> {
    let (skip, url) = testsupport::get_proxy_url()?;
    if skip {
        return Ok(());
    }
    let client = ClientBuilder::from_env()?.build()?;
    assert_eq!(client.endpoint().as_str().trim_end_matches('/'), url.trim_end_matches('/'));

    let topics = client.topics().await?;
    println!("Topics {:?}", topics.iter().map(|t| t.name()).collect::<Vec<_>>());

    let brokers = client.brokers().await?;
    assert!(!brokers.is_empty());
    Ok(())
}

#[tokio::test]
async fn it_returns_topic_not_found() -> Result<(), Box<Error>> {
    let (skip, _) = testsupport::get_proxy_url()?;
    if skip {
        return Ok(());
    }
    let client = ClientBuilder::from_env()?.build()?;
    let name = format!("missing-{}", random_word::gen(Lang::En));

    let err = client.topic(name).metadata().await.unwrap_err();
    assert_eq!(
        err.response_error().map(|err| err.kind),
        Some(ResponseErrorKind::TopicNotFound)
    );
    Ok(())
}

#[tokio::test]
async fn it_can_produce_then_consume() -> Result<(), Box<Error>> {
    let (skip, _, topic) = testsupport::get_proxy_url_and_topic()?;
    if skip {
        return Ok(());
    }
    let client = ClientBuilder::from_env()?.build()?;

    let request = ProduceRequest::new(Format::Binary)
        .record(Record::new(&b"Value 1"[..]).with_key(&b"Tester"[..]));
    let response = client.topic(topic.as_str()).produce(&request).await?;
    assert_eq!(response.failures().count(), 0);

    let consumer = client
        .consumer(format!("group-{}", random_word::gen(Lang::En)))
        .create(
            ConsumerConfig::new(Format::Binary)
                .name(random_word::gen(Lang::En))
                .auto_offset_reset(OffsetReset::Smallest),
        )
        .await?;

    // the first read after creating an instance is often empty
    let mut messages = consumer.read(&topic).await?;
    if messages.is_empty() {
        messages = consumer.read(&topic).await?;
    }
    println!("Read {} messages", messages.len());

    consumer.commit().await?;
    consumer.destroy().await?;
    Ok(())
}
