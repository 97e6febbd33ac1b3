//! Page navigation over paged collections.

use crate::service::ResourceService;
use hateoas_model::{PagedResourceCollection, Relational};
use hateoas_types::{HateoasResult, RequestOptions, SELF_RELATION};
use hateoas_url::remove_template_params;

impl ResourceService {
    pub async fn first_page(
        &self,
        paged: &PagedResourceCollection,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        self.follow_page_link(paged, "first", options).await
    }

    pub async fn last_page(
        &self,
        paged: &PagedResourceCollection,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        self.follow_page_link(paged, "last", options).await
    }

    pub async fn next_page(
        &self,
        paged: &PagedResourceCollection,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        self.follow_page_link(paged, "next", options).await
    }

    pub async fn prev_page(
        &self,
        paged: &PagedResourceCollection,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        self.follow_page_link(paged, "prev", options).await
    }

    /// Re-requests the collection behind `paged` with the page and sort from
    /// `options`, falling back to the configured default page.
    pub async fn custom_page(
        &self,
        paged: &PagedResourceCollection,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        let href = remove_template_params(&paged.relation_link(SELF_RELATION)?.href)?;
        let base = href.split('?').next().unwrap_or_default();
        let url = self.proxied(base)?;

        let options = self.with_default_page(options);
        self.fetch_page(&url, &options, options.is_projection()).await
    }

    /// Navigation links already carry page, size and sort.
    async fn follow_page_link(
        &self,
        paged: &PagedResourceCollection,
        relation: &str,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        let href = remove_template_params(&paged.relation_link(relation)?.href)?;
        let url = self.proxied(&href)?;
        self.fetch_page(&url, &options.without_query(), options.is_projection())
            .await
    }
}
