use futures_util::StreamExt;
use serde::de::DeserializeOwned;

/// Reads the collection and fails if stored documents do not deserialize as `T`.
pub async fn verify<T>(collection: &mongodb::Collection<T>, all: bool) -> anyhow::Result<()>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let mut cursor = collection.find(None, None).await?;

    let mut checked = 0;
    while let Some(value) = cursor.next().await {
        let _ = value?;
        checked += 1;
        if !all {
            break;
        }
    }

    log::info!(
        "Verified {} documents in collection {}",
        checked,
        collection.name()
    );
    Ok(())
}
