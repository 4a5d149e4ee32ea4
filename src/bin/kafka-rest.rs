use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use kafka_rest::prelude::{
    Client, ClientBuilder, Error, Format, ProduceRequest, Record, Result, TopicMetadata,
};

#[derive(Parser)]
#[command(name = "kafka-rest")]
#[command(about = "Talk to a Kafka REST Proxy")]
struct Cli {
    /// REST proxy endpoint
    #[arg(long, env = "KAFKA_REST_URL", default_value = "http://localhost:8082")]
    url: String,

    #[arg(long, env = "KAFKA_REST_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "KAFKA_REST_PASSWORD")]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List topic names
    Topics,
    /// List broker ids
    Brokers,
    /// Show a topic's configs and partitions
    Topic { name: String },
    /// Produce one record
    Produce {
        topic: String,
        value: String,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        partition: Option<i32>,
        #[arg(long, value_enum, default_value = "binary")]
        format: CliFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    Binary,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder = ClientBuilder::new(cli.url);
    if let Some(username) = cli.username {
        builder = builder.username(username);
    }
    if let Some(password) = cli.password {
        builder = builder.password(password);
    }

    let result = match builder.build() {
        Ok(client) => run(client, cli.command).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: Client, command: Commands) -> Result<()> {
    match command {
        Commands::Topics => {
            for topic in client.topics().await? {
                println!("{}", topic.name());
            }
        }
        Commands::Brokers => {
            for broker in client.brokers().await? {
                println!("{}", broker);
            }
        }
        Commands::Topic { name } => {
            let metadata = client.topic(name).metadata().await?;
            println!("{}", pretty(&metadata)?);
        }
        Commands::Produce {
            topic,
            value,
            key,
            partition,
            format,
        } => {
            let (format, mut record) = match format {
                CliFormat::Binary => (Format::Binary, Record::new(value.into_bytes())),
                CliFormat::Json => {
                    let value = serde_json::from_str::<serde_json::Value>(&value)
                        .map_err(|err| Error::ArgError(err.to_string()))?;
                    (Format::Json, Record::new(value))
                }
            };
            if let Some(key) = key {
                record = match format {
                    Format::Json => record.with_key(serde_json::Value::String(key)),
                    _ => record.with_key(key.into_bytes()),
                };
            }

            let request = ProduceRequest::new(format).record(record);
            let topic = client.topic(topic);
            let response = match partition {
                Some(partition) => topic.partition(partition).produce(&request).await?,
                None => topic.produce(&request).await?,
            };

            for offset in response.offsets {
                match offset.as_error() {
                    Some(err) => return Err(err.into()),
                    None => println!(
                        "partition {} offset {}",
                        offset.partition.unwrap_or_default(),
                        offset.offset.unwrap_or_default()
                    ),
                }
            }
        }
    }
    Ok(())
}

fn pretty(metadata: &TopicMetadata) -> Result<String> {
    serde_json::to_string_pretty(metadata).map_err(|err| Error::ArgError(err.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pretty_prints_topic_metadata() {
        let metadata = TopicMetadata {
            name: "purchases".to_string(),
            ..Default::default()
        };
        let rendered = pretty(&metadata).unwrap();
        assert!(rendered.contains("\n  \"name\": \"purchases\""));
        assert_eq!(
            serde_json::from_str::<TopicMetadata>(&rendered).unwrap(),
            metadata
        );
    }
}
