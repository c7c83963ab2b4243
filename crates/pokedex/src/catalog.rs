//! Catalog fetchers
//!
//! Three query types back the result list: the type catalog, one page of the
//! unfiltered listing, and the full item lists of a type combination. Each goes
//! through its own [`QueryCache`], all keyed by [`QueryKey`].

use crate::prelude::*;
use futures::future::{try_join_all, FutureExt};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pokedex_core::aggregate::{FetchState, ResultView};
use pokedex_core::catalog::{
    listing_path, transform_listing, transform_type_detail, transform_types, type_detail_path,
    types_path, Facet, FacetItems, ListingPage, ListingResponse, TypeDetailResponse,
    TypeListResponse,
};
use pokedex_core::query::{normalize_facets, QueryKey};
use pokedex_core::session::Session;

use crate::cache::{QueryCache, RetryPolicy, SharedFetch};
use crate::client::{ApiClient, Transport};
use crate::config::Config;

pub struct Catalog<T: Transport> {
    transport: Arc<T>,
    retry: RetryPolicy,
    facets: QueryCache<Vec<Facet>>,
    listings: QueryCache<ListingPage>,
    by_facets: QueryCache<Vec<FacetItems>>,
}

impl<T: Transport> Catalog<T> {
    pub fn new(transport: T, stale_after: Duration, retry: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            retry,
            facets: QueryCache::new(stale_after),
            listings: QueryCache::new(stale_after),
            by_facets: QueryCache::new(stale_after),
        }
    }

    /// Fetch the type catalog. Failures are not retried.
    pub fn facets(&self) -> SharedFetch<Vec<Facet>> {
        let transport = Arc::clone(&self.transport);
        self.facets
            .fetch(QueryKey::Facets, RetryPolicy::none(), move || {
                let transport = Arc::clone(&transport);
                async move { fetch_facets(transport.as_ref()).await }
            })
    }

    /// Fetch one page of the unfiltered listing.
    ///
    /// While types are selected (`disabled`) the listing is inert: it resolves
    /// to an empty page right away and never reaches the network.
    pub fn listing(&self, page: usize, disabled: bool) -> SharedFetch<ListingPage> {
        if disabled {
            return async { Ok::<_, Error>(ListingPage::empty()) }.boxed().shared();
        }

        let transport = Arc::clone(&self.transport);
        self.listings
            .fetch(QueryKey::listing(page), self.retry, move || {
                let transport = Arc::clone(&transport);
                async move { fetch_listing(transport.as_ref(), page).await }
            })
    }

    pub fn listing_state(&self, page: usize, disabled: bool) -> FetchState<ListingPage> {
        if disabled {
            return FetchState::Ready(ListingPage::empty());
        }
        self.listings.peek(&QueryKey::listing(page))
    }

    /// Fetch the full item list of every type in `facets`, all or nothing.
    pub fn by_facets(&self, facets: &[u32]) -> SharedFetch<Vec<FacetItems>> {
        if facets.is_empty() {
            return async { Ok::<_, Error>(Vec::new()) }.boxed().shared();
        }

        let facets = normalize_facets(facets);
        let key = QueryKey::ByFacets(facets.clone());
        let transport = Arc::clone(&self.transport);
        self.by_facets.fetch(key, self.retry, move || {
            let transport = Arc::clone(&transport);
            let facets = facets.clone();
            async move { fetch_by_facets(transport.as_ref(), &facets).await }
        })
    }

    pub fn by_facets_state(&self, facets: &[u32]) -> FetchState<Vec<FacetItems>> {
        if facets.is_empty() {
            return FetchState::Ready(Vec::new());
        }
        self.by_facets.peek(&QueryKey::by_facets(facets))
    }

    /// Start every fetch `session` depends on; the returned future settles once they all have.
    ///
    /// Failures are not returned here, they are recorded in the cache and surface through the view.
    pub fn request(&self, session: &Session) -> impl Future<Output = ()> + Send + 'static {
        let filtered = self.by_facets(session.selected());
        let plain = self.listing(session.page(), session.is_filtered());
        async move {
            let _ = futures::join!(filtered, plain);
        }
    }

    /// Reconcile whatever the cache holds right now for `session`
    pub fn current_view(&self, session: &mut Session) -> ResultView {
        let filtered = self.by_facets_state(session.selected());
        let plain = self.listing_state(session.page(), session.is_filtered());
        session.view(&filtered, &plain)
    }

    /// Fetch what `session` needs and return the settled view
    pub async fn settle(&self, session: &mut Session) -> ResultView {
        self.request(session).await;
        self.current_view(session)
    }
}

impl Catalog<ApiClient> {
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ApiClient::new(config)?,
            config.stale_after,
            config.retry,
        ))
    }
}

async fn get_decoded<T: Transport, R: DeserializeOwned>(transport: &T, path: &str) -> FetchResult<R> {
    let value = transport.get_json(path).await?;
    serde_json::from_value(value).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

async fn fetch_facets<T: Transport>(transport: &T) -> FetchResult<Vec<Facet>> {
    let response: TypeListResponse = get_decoded(transport, types_path()).await?;
    Ok(transform_types(response))
}

async fn fetch_listing<T: Transport>(transport: &T, page: usize) -> FetchResult<ListingPage> {
    let response: ListingResponse = get_decoded(transport, &listing_path(page)).await?;
    Ok(transform_listing(response))
}

async fn fetch_by_facets<T: Transport>(
    transport: &T,
    facets: &[u32],
) -> FetchResult<Vec<FacetItems>> {
    let requests = facets.iter().map(|&facet| async move {
        let response: TypeDetailResponse = get_decoded(transport, &type_detail_path(facet))
            .await
            .map_err(|e| Error::Aggregate {
                facet,
                message: e.to_string(),
            })?;
        // Keyed by the requested type so the selection always lines up with the results
        Ok::<_, Error>(FacetItems {
            facet,
            ..transform_type_detail(response)
        })
    });

    try_join_all(requests).await
}
