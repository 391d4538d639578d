//! Dynamic property search service
//!
//! Searches run in two steps: the store selects one page of ids, then the
//! entities are batch-loaded through their services and put back in id order.
//! Results are cached per criteria fingerprint under the dynamic properties
//! region, so any property or dictionary item write makes them stale.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::app::{DictionaryItemService, DynamicPropertyService};
use crate::cache::{cache_key, CacheRegion, PlatformMemoryCache};
use crate::domain::entities::{
    reorder_by_ids, DictionaryItem, DictionaryItemSearchCriteria, DynamicProperty,
    DynamicPropertySearchCriteria, SearchResult,
};
use crate::domain::ports::{DictionaryItemRepository, DynamicPropertyRepository};
use crate::error::DomainError;

const SERVICE_NAME: &str = "DynamicPropertySearchService";

/// Run `fut` unless `token` is cancelled first
///
/// The token is checked before `fut` is first polled and raced against it
/// afterwards; a cancelled `fut` is dropped.
async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    if token.is_cancelled() {
        return Err(DomainError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(DomainError::Cancelled),
        result = fut => result,
    }
}

/// Paginated, cached search over dynamic properties and dictionary items
pub struct DynamicPropertySearchService<PR, DR>
where
    PR: DynamicPropertyRepository,
    DR: DictionaryItemRepository,
{
    property_store: Arc<PR>,
    item_store: Arc<DR>,
    properties: Arc<DynamicPropertyService<PR, DR>>,
    dictionary_items: Arc<DictionaryItemService<DR, PR>>,
    cache: Arc<PlatformMemoryCache>,
    region: Arc<CacheRegion>,
}

impl<PR, DR> DynamicPropertySearchService<PR, DR>
where
    PR: DynamicPropertyRepository,
    DR: DictionaryItemRepository,
{
    pub fn new(
        property_store: Arc<PR>,
        item_store: Arc<DR>,
        properties: Arc<DynamicPropertyService<PR, DR>>,
        dictionary_items: Arc<DictionaryItemService<DR, PR>>,
        cache: Arc<PlatformMemoryCache>,
        region: Arc<CacheRegion>,
    ) -> Self {
        Self {
            property_store,
            item_store,
            properties,
            dictionary_items,
            cache,
            region,
        }
    }

    pub async fn search_dynamic_properties(
        &self,
        criteria: &DynamicPropertySearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<SearchResult<DynamicProperty>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let query = criteria.to_query()?;
        let key = cache_key(SERVICE_NAME, "search_dynamic_properties", criteria)?;
        let query = &query;

        self.cache
            .get_or_create_exclusive(&key, &self.region, move || async move {
                cancellable(cancel, async move {
                    let page = self.property_store.search_ids(query).await?;
                    let loaded = self.properties.get_dynamic_properties(&page.ids).await?;
                    tracing::debug!(
                        "Property search matched {}, loaded {} of page {}",
                        page.total_count,
                        loaded.len(),
                        page.ids.len()
                    );

                    Ok(SearchResult {
                        total_count: page.total_count,
                        results: reorder_by_ids(loaded, &page.ids, |p| &p.id),
                    })
                })
                .await
            })
            .await
    }

    pub async fn search_dictionary_items(
        &self,
        criteria: &DictionaryItemSearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<SearchResult<DictionaryItem>, DomainError> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let query = criteria.to_query()?;
        let key = cache_key(SERVICE_NAME, "search_dictionary_items", criteria)?;
        let query = &query;

        self.cache
            .get_or_create_exclusive(&key, &self.region, move || async move {
                cancellable(cancel, async move {
                    let page = self.item_store.search_ids(query).await?;
                    let loaded = self.dictionary_items.get_dictionary_items(&page.ids).await?;

                    Ok(SearchResult {
                        total_count: page.total_count,
                        results: reorder_by_ids(loaded, &page.ids, |i| &i.id),
                    })
                })
                .await
            })
            .await
    }
}
