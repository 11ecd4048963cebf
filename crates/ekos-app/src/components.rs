//! Scaffold-component catalogue.
//!
//! Components mirror the report lifecycle but carry no detachable
//! attachments: up to three jpeg/png preview images are embedded as data
//! URIs at creation and never change afterwards. The catalogue is filtered
//! and paginated entirely client-side over the fetched set, 20 rows per page.

use base64::Engine;
use bytes::Bytes;

use ekos_api_client::ApiClient;
use ekos_core::constants::{CATALOG_PAGE_SIZE, MAX_COMPONENT_IMAGES};
use ekos_core::error::AppError;
use ekos_core::models::{
    BulkDeleteResponse, ComplianceStatus, ScaffoldComponent, ScaffoldComponentDraft,
};
use ekos_core::validation::{admit_file, FileSlot};

use crate::pagination::Pagination;

/// Client-side catalogue filter; all predicates combine with logical AND.
#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    pub search: String,
    pub firm: Option<String>,
    pub compliance: Option<ComplianceStatus>,
    pub project_id: Option<String>,
}

impl ComponentFilter {
    fn matches(&self, component: &ScaffoldComponent) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = component.name.to_lowercase().contains(&needle)
                || component.material_code.to_lowercase().contains(&needle)
                || component.firm.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(firm) = self.firm.as_deref() {
            if component.firm != firm {
                return false;
            }
        }
        if let Some(compliance) = self.compliance {
            if component.compliance != Some(compliance) {
                return false;
            }
        }
        if let Some(project_id) = self.project_id.as_deref() {
            if component.project_id != project_id {
                return false;
            }
        }
        true
    }
}

pub struct ComponentCatalog {
    client: ApiClient,
    components: Vec<ScaffoldComponent>,
    filter: ComponentFilter,
    pagination: Pagination,
}

impl ComponentCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            components: Vec::new(),
            filter: ComponentFilter::default(),
            pagination: Pagination::new(CATALOG_PAGE_SIZE),
        }
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.components = self.client.list_components().await?;
        self.pagination.reclamp(self.visible().len());
        Ok(())
    }

    pub fn components(&self) -> &[ScaffoldComponent] {
        &self.components
    }

    pub fn filter(&self) -> &ComponentFilter {
        &self.filter
    }

    /// Filter changes jump back to the first page, like a fresh search.
    pub fn set_filter(&mut self, filter: ComponentFilter) {
        self.filter = filter;
        self.pagination.reset();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.pagination.reset();
    }

    pub fn visible(&self) -> Vec<&ScaffoldComponent> {
        self.components
            .iter()
            .filter(|c| self.filter.matches(c))
            .collect()
    }

    pub fn page_items(&self) -> Vec<&ScaffoldComponent> {
        let visible = self.visible();
        self.pagination.slice(&visible).to_vec()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn set_page(&mut self, page: usize) {
        let count = self.visible().len();
        self.pagination.set_page(page, count);
    }

    pub fn next_page(&mut self) {
        let count = self.visible().len();
        self.pagination.next(count);
    }

    pub fn previous_page(&mut self) {
        let count = self.visible().len();
        self.pagination.previous(count);
    }

    /// Distinct firm names in the backing set, for the firm filter control.
    pub fn firms(&self) -> Vec<String> {
        let mut firms: Vec<String> = self.components.iter().map(|c| c.firm.clone()).collect();
        firms.sort_unstable();
        firms.dedup();
        firms
    }

    /// Create a component after local validation, then re-fetch.
    pub async fn create(
        &mut self,
        draft: ScaffoldComponentDraft,
    ) -> Result<ScaffoldComponent, AppError> {
        if !self.client.session().can_edit() {
            return Err(AppError::Forbidden(
                "Bileşen ekleme yetkiniz yok".to_string(),
            ));
        }
        validate_draft(&draft)?;
        let created = self.client.create_component(&draft).await?;
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "re-fetch after component create failed");
        }
        Ok(created)
    }

    pub async fn bulk_delete(
        &mut self,
        component_ids: &[String],
    ) -> Result<BulkDeleteResponse, AppError> {
        if !self.client.session().can_edit() {
            return Err(AppError::Forbidden(
                "Bileşen silme yetkiniz yok".to_string(),
            ));
        }
        let response = self.client.bulk_delete_components(component_ids).await?;
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "re-fetch after component bulk delete failed");
        }
        Ok(response)
    }

    /// Excel export passthrough; the bytes are opaque to this layer.
    pub async fn export_excel(&self) -> Result<Bytes, AppError> {
        self.client.export_components_excel().await
    }
}

fn validate_draft(draft: &ScaffoldComponentDraft) -> Result<(), AppError> {
    if draft.project_id.trim().is_empty() {
        return Err(AppError::Validation("Lütfen bir proje seçin".to_string()));
    }
    if draft.name.trim().is_empty()
        || draft.material_code.trim().is_empty()
        || draft.firm.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Lütfen zorunlu alanları doldurun".to_string(),
        ));
    }
    if draft.quantity < 1 {
        return Err(AppError::Validation(
            "Bileşen adedi en az 1 olmalıdır".to_string(),
        ));
    }
    if draft.images.len() > MAX_COMPONENT_IMAGES {
        return Err(AppError::Validation(
            "Maksimum 3 görsel yükleyebilirsiniz".to_string(),
        ));
    }
    Ok(())
}

/// Embed a preview image into a draft as a data URI. Admission follows the
/// image slot rules (jpeg/png, size cap); the third rejection is the count.
pub fn embed_component_image(
    draft: &mut ScaffoldComponentDraft,
    file_name: &str,
    bytes: &[u8],
) -> Result<(), AppError> {
    if draft.images.len() >= MAX_COMPONENT_IMAGES {
        return Err(AppError::Validation(
            "Maksimum 3 görsel yükleyebilirsiniz".to_string(),
        ));
    }
    let content_type = admit_file(FileSlot::Image, file_name, bytes.len() as u64)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    draft
        .images
        .push(format!("data:{};base64,{}", content_type, encoded));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ekos_api_client::Session;
    use ekos_core::ClientConfig;

    fn component(id: &str, name: &str, firm: &str, project: &str) -> ScaffoldComponent {
        ScaffoldComponent {
            id: id.to_string(),
            project_id: project.to_string(),
            name: name.to_string(),
            material_code: format!("ISK-{id}"),
            quantity: 10,
            firm: firm.to_string(),
            period: "6 Aylık".to_string(),
            valid_until: None,
            compliance: Some(ComplianceStatus::Compliant),
            images: Vec::new(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn catalog_with(components: Vec<ScaffoldComponent>) -> ComponentCatalog {
        let client = ApiClient::new(ClientConfig::default(), Session::new()).unwrap();
        let mut catalog = ComponentCatalog::new(client);
        catalog.components = components;
        catalog
    }

    #[test]
    fn search_matches_name_code_and_firm_case_insensitively() {
        let mut catalog = catalog_with(vec![
            component("1", "Çelik Direk", "ABC İnşaat", "p-1"),
            component("2", "Bağlantı Elemanı", "XYZ Yapı", "p-1"),
        ]);
        catalog.set_search("çelik");
        assert_eq!(catalog.visible().len(), 1);
        catalog.set_search("xyz");
        assert_eq!(catalog.visible().len(), 1);
        catalog.set_search("ISK-1");
        assert_eq!(catalog.visible().len(), 1);
        catalog.set_search("yok");
        assert!(catalog.visible().is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let mut catalog = catalog_with(vec![
            component("1", "Direk", "ABC İnşaat", "p-1"),
            component("2", "Direk", "ABC İnşaat", "p-2"),
            component("3", "Direk", "XYZ Yapı", "p-1"),
        ]);
        catalog.set_filter(ComponentFilter {
            firm: Some("ABC İnşaat".to_string()),
            project_id: Some("p-1".to_string()),
            ..Default::default()
        });
        let visible = catalog.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let components: Vec<ScaffoldComponent> = (0..45)
            .map(|i| component(&i.to_string(), "Direk", "ABC", "p-1"))
            .collect();
        let mut catalog = catalog_with(components);
        catalog.set_page(3);
        assert_eq!(catalog.pagination().page(), 3);
        catalog.set_search("direk");
        assert_eq!(catalog.pagination().page(), 1);
        assert_eq!(catalog.page_items().len(), 20);
    }

    #[test]
    fn firms_are_distinct_and_sorted() {
        let catalog = catalog_with(vec![
            component("1", "A", "XYZ Yapı", "p-1"),
            component("2", "B", "ABC İnşaat", "p-1"),
            component("3", "C", "ABC İnşaat", "p-1"),
        ]);
        assert_eq!(catalog.firms(), vec!["ABC İnşaat", "XYZ Yapı"]);
    }

    #[test]
    fn draft_validation_enforces_required_fields_and_quantity() {
        let draft = ScaffoldComponentDraft::default();
        assert!(matches!(
            validate_draft(&draft),
            Err(AppError::Validation(_))
        ));

        let mut draft = ScaffoldComponentDraft {
            project_id: "p-1".to_string(),
            name: "Direk".to_string(),
            material_code: "ISK-1".to_string(),
            firm: "ABC".to_string(),
            ..Default::default()
        };
        assert!(validate_draft(&draft).is_ok());
        draft.quantity = 0;
        assert!(validate_draft(&draft).is_err());
    }

    #[test]
    fn embedded_images_cap_at_three_jpeg_png_only() {
        let mut draft = ScaffoldComponentDraft::default();
        embed_component_image(&mut draft, "a.jpg", &[1, 2]).unwrap();
        embed_component_image(&mut draft, "b.png", &[3]).unwrap();
        assert!(embed_component_image(&mut draft, "c.pdf", &[4]).is_err());
        embed_component_image(&mut draft, "c.jpeg", &[4]).unwrap();
        assert!(matches!(
            embed_component_image(&mut draft, "d.png", &[5]),
            Err(AppError::Validation(_))
        ));
        assert_eq!(draft.images.len(), 3);
        assert!(draft.images[0].starts_with("data:image/jpeg;base64,"));
    }
}
