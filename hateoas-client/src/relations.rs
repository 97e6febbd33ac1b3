//! Relation traversal and binding.

use crate::service::{Reply, ResourceService};
use crate::transport::RequestBody;
use hateoas_model::{PagedResourceCollection, Relational, Resource, ResourceCollection};
use hateoas_types::{assert_present, HateoasError, HateoasResult, RequestOptions};
use hateoas_url::{fill_template, remove_template_params};

impl ResourceService {
    /// Follows `relation` to a single resource.
    pub async fn get_relation<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        options: &RequestOptions,
    ) -> HateoasResult<Resource> {
        let (url, query) = self.relation_target(owner, relation, options)?;
        self.fetch_resource(&url, &query, options.is_projection())
            .await
    }

    pub async fn get_related_collection<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        options: &RequestOptions,
    ) -> HateoasResult<ResourceCollection> {
        let (url, query) = self.relation_target(owner, relation, options)?;
        self.fetch_collection(&url, &query, options.is_projection())
            .await
    }

    pub async fn get_related_page<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        options: &RequestOptions,
    ) -> HateoasResult<PagedResourceCollection> {
        let options = self.with_default_page(options);
        let (url, query) = self.relation_target(owner, relation, &options)?;
        self.fetch_page(&url, &query, options.is_projection()).await
    }

    /// Replaces the targets of `relation` with `entities` (PUT `text/uri-list`).
    pub async fn bind_relation<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        entities: &[&Resource],
    ) -> HateoasResult<Reply> {
        let url = self.relation_href(owner, relation)?;
        let body = self.uri_list(entities)?;
        let options = RequestOptions::new();
        let response = self.executor().put(&url, Some(body), &options).await?;
        Ok(self.reply(response, &options))
    }

    /// Adds `entities` to a collection relation (POST `text/uri-list`).
    pub async fn add_collection_relation<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        entities: &[&Resource],
    ) -> HateoasResult<Reply> {
        let url = self.relation_href(owner, relation)?;
        let body = self.uri_list(entities)?;
        let options = RequestOptions::new();
        let response = self.executor().post(&url, Some(body), &options).await?;
        Ok(self.reply(response, &options))
    }

    /// Clears a single-valued relation.
    pub async fn unbind_relation<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
    ) -> HateoasResult<Reply> {
        let url = self.relation_href(owner, relation)?;
        let options = RequestOptions::new();
        let response = self.executor().delete(&url, &options).await?;
        Ok(self.reply(response, &options))
    }

    /// Removes one entity from a collection relation (DELETE
    /// `relation_href/<entity id>`).
    pub async fn delete_relation<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        entity: &Resource,
    ) -> HateoasResult<Reply> {
        let href = self.relation_href(owner, relation)?;
        let id = entity.resource_id();
        assert_present(&[("entityId", &id)])?;
        let url = format!("{}/{}", href.trim_end_matches('/'), id.unwrap_or_default());

        let options = RequestOptions::new();
        let response = self.executor().delete(&url, &options).await?;
        Ok(self.reply(response, &options))
    }

    /// URL and remaining query options for a relation GET. Templated links
    /// consume the options during expansion.
    fn relation_target<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
        options: &RequestOptions,
    ) -> HateoasResult<(String, RequestOptions)> {
        assert_present(&[("relationName", &relation)])?;
        let link = owner.relation_link(relation)?;
        let (url, query) = if link.is_templated() {
            (fill_template(&link.href, options)?, options.without_query())
        } else {
            (link.href.clone(), options.clone())
        };
        Ok((self.proxied(&url)?, query))
    }

    fn relation_href<R: Relational + ?Sized>(
        &self,
        owner: &R,
        relation: &str,
    ) -> HateoasResult<String> {
        assert_present(&[("relationName", &relation)])?;
        let link = owner.relation_link(relation)?;
        self.proxied(&remove_template_params(&link.href)?)
    }

    fn uri_list(&self, entities: &[&Resource]) -> HateoasResult<RequestBody> {
        assert_present(&[("entities", &entities)])?;
        let hrefs = entities
            .iter()
            .map(|entity| {
                let href = entity.self_href().ok_or_else(|| {
                    HateoasError::invalid_param("entities must be addressable resources")
                })?;
                remove_template_params(href)
            })
            .collect::<HateoasResult<Vec<_>>>()?;
        Ok(RequestBody::uri_list(hrefs.iter().map(String::as_str)))
    }
}
