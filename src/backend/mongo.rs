//! MongoDB backend.
//!
//! A batch becomes one ordered `update` command, the same shape the drivers
//! emit for a bulk write made of update-one models.

use async_trait::async_trait;
use log::{debug, info};
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::conf::BackendConfig;
use crate::core::BenchError;
use crate::workload::{Batch, Fields};

use super::BulkBackend;

const APP_NAME: &str = "bulkbench";

pub struct MongoBackend {
    client: Client,
    database: Database,
    collection: String,
}

impl MongoBackend {
    /// Build a client and ping the deployment so unreachable servers fail
    /// here rather than on the first submission.
    pub async fn connect(config: &BackendConfig) -> Result<Self, BenchError> {
        let mut options = ClientOptions::parse(config.endpoint.as_str())
            .await
            .map_err(|e| BenchError::ConnectionError(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client =
            Client::with_options(options).map_err(|e| BenchError::ConnectionError(e.to_string()))?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| BenchError::ConnectionError(e.to_string()))?;

        info!(
            "using collection {}.{}",
            config.database, config.collection
        );
        Ok(Self {
            database: client.database(&config.database),
            client,
            collection: config.collection.clone(),
        })
    }
}

#[async_trait]
impl BulkBackend for MongoBackend {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let reply = self
            .database
            .run_command(update_command(&self.collection, batch))
            .await?;
        parse_update_reply(&reply)
    }

    async fn close(&mut self) -> Result<(), BenchError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

fn to_document(fields: &Fields) -> Document {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), Bson::String(v.clone())))
        .collect()
}

/// `{update: <coll>, updates: [{q, u: {$set}, multi: false}], ordered: true}`
pub(crate) fn update_command(collection: &str, batch: &Batch) -> Document {
    let updates: Vec<Document> = batch
        .iter()
        .map(|spec| {
            doc! {
                "q": to_document(spec.filter()),
                "u": { "$set": to_document(spec.update()) },
                "multi": false,
                "upsert": false,
            }
        })
        .collect();
    doc! {
        "update": collection,
        "updates": updates,
        "ordered": true,
    }
}

/// Extract the matched count, turning any write or write-concern error into
/// a submission failure.
pub(crate) fn parse_update_reply(reply: &Document) -> Result<u64, BenchError> {
    if let Ok(errors) = reply.get_array("writeErrors") {
        if let Some(first) = errors.first() {
            let message = first
                .as_document()
                .and_then(|e| e.get_str("errmsg").ok())
                .unwrap_or("unknown write error");
            return Err(BenchError::SubmissionError(format!(
                "{} write error(s), first: {}",
                errors.len(),
                message
            )));
        }
    }
    if let Ok(concern) = reply.get_document("writeConcernError") {
        let message = concern.get_str("errmsg").unwrap_or("unknown");
        return Err(BenchError::SubmissionError(format!(
            "write concern error: {message}"
        )));
    }

    let matched = match reply.get("n") {
        Some(Bson::Int32(n)) => *n as u64,
        Some(Bson::Int64(n)) => *n as u64,
        _ => 0,
    };
    debug!("update acknowledged, matched {}", matched);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{BatchGenerator, TimestampGenerator};

    #[test]
    fn test_update_command_shape() {
        let batch = TimestampGenerator::new().generate(3);
        let command = update_command("bar", &batch);

        assert_eq!(command.keys().next().map(String::as_str), Some("update"));
        assert_eq!(command.get_str("update").unwrap(), "bar");
        assert!(command.get_bool("ordered").unwrap());

        let updates = command.get_array("updates").unwrap();
        assert_eq!(updates.len(), 3);
        let first = updates[0].as_document().unwrap();
        assert!(first.get_document("q").unwrap().contains_key("name"));
        assert_eq!(
            first
                .get_document("u")
                .unwrap()
                .get_document("$set")
                .unwrap()
                .get_str("foo")
                .unwrap(),
            "bar"
        );
        assert!(!first.get_bool("multi").unwrap());
    }

    #[test]
    fn test_parse_reply_counts_matches() {
        let reply = doc! { "n": 4, "nModified": 4, "ok": 1.0 };
        assert_eq!(parse_update_reply(&reply), Ok(4));
    }

    #[test]
    fn test_parse_reply_write_errors() {
        let reply = doc! {
            "n": 0,
            "ok": 1.0,
            "writeErrors": [{ "index": 0, "code": 121, "errmsg": "Document failed validation" }],
        };
        assert_eq!(
            parse_update_reply(&reply),
            Err(BenchError::SubmissionError(
                "1 write error(s), first: Document failed validation".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_reply_write_concern_error() {
        let reply = doc! {
            "n": 1,
            "ok": 1.0,
            "writeConcernError": { "code": 64, "errmsg": "waiting for replication timed out" },
        };
        assert!(matches!(
            parse_update_reply(&reply),
            Err(BenchError::SubmissionError(_))
        ));
    }
}
