//! Sign a DynamoDB Query request and print the signed headers.
//!
//! Credentials come from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY` or the
//! JSON file named by `AWS_CREDENTIAL_FILE`.

use cloudsign_aws_v4::{DefaultCredentialProvider, RequestSigner};
use cloudsign_core::{Context, Result, Signer};
use cloudsign_file_read_tokio::TokioFileRead;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new().with_file_read(TokioFileRead);
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new("dynamodb", "us-east-1"),
    );

    let body = serde_json::json!({
        "TableName": "temperature_data",
        "KeyConditionExpression": "#id = :id and #timestamp > :timestamp",
        "ExpressionAttributeNames": {
            "#id": "id",
            "#timestamp": "timestamp",
        },
        "ExpressionAttributeValues": {
            ":id": {"N": "1"},
            ":timestamp": {"N": "1586246400"},
        },
    })
    .to_string();

    let mut parts = http::Request::builder()
        .method("POST")
        .uri("https://dynamodb.us-east-1.amazonaws.com/")
        .header("accept-encoding", "identity")
        .header("content-type", "application/x-amz-json-1.0")
        .header("x-amz-target", "DynamoDB_20120810.Query")
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0;

    signer.sign(&mut parts, body.as_bytes()).await?;

    println!("{} {}", parts.method, parts.uri);
    for (name, value) in parts.headers.iter() {
        println!("{}: {}", name, value.to_str().unwrap_or("<opaque>"));
    }

    Ok(())
}
