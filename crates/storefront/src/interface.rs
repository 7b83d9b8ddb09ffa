//! Panel visibility and viewport state.
//!
//! [`InterfaceState`] is changed only through [`InterfaceState::apply`], one
//! [`InterfaceAction`] at a time. The cart and contributor area constrain each
//! other on mobile viewports only: two full-screen panels never stay open
//! together on a narrow screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use swag_store_core::{PanelStatus, ViewportClass};

/// A product image shown in the image browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image ID.
    pub id: String,
    /// Image URL.
    pub src: String,
    /// Alt text.
    pub alt_text: Option<String>,
}

/// Ephemeral interface state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceState {
    /// Viewport class; `None` until the viewport observer has mounted.
    pub viewport: Option<ViewportClass>,
    pub cart_status: PanelStatus,
    pub contributor_area_status: PanelStatus,
    pub product_images_browser_status: PanelStatus,
    /// Images of the product currently on screen.
    pub current_product_images: Vec<ProductImage>,
    /// Image enlarged in the browser. Left in place when the browser closes.
    pub product_image_featured: Option<ProductImage>,
}

/// Transitions of [`InterfaceState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAction {
    /// Record the viewport class reported by the media query.
    SetViewport(ViewportClass),
    /// Flip the cart; closes the contributor area on mobile.
    ToggleCart,
    /// Flip the contributor area, or pick its first-open default.
    ToggleContributorArea,
    /// Force the contributor area open.
    OpenContributorArea,
    /// `Some` opens the browser on that image, `None` closes it.
    ToggleProductImagesBrowser(Option<ProductImage>),
    /// Force the image browser closed.
    CloseProductImagesBrowser,
    /// Replace the featured image without touching visibility.
    FeatureProductImage(Option<ProductImage>),
    /// Replace the image collection and clear the featured image.
    SetCurrentProductImages(Vec<ProductImage>),
}

impl InterfaceState {
    /// Whether the viewport is known to be mobile.
    ///
    /// An unknown viewport is neither mobile nor desktop.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.viewport == Some(ViewportClass::Mobile)
    }

    /// Whether the viewport is known to be desktop.
    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.viewport == Some(ViewportClass::Desktop)
    }

    /// Whether the image browser has anything to show.
    #[must_use]
    pub fn has_product_images(&self) -> bool {
        !self.current_product_images.is_empty()
    }

    /// Apply one transition.
    pub fn apply(&mut self, action: InterfaceAction) {
        debug!(?action, "interface transition");

        match action {
            InterfaceAction::SetViewport(class) => {
                self.viewport = Some(class);
            }
            InterfaceAction::ToggleCart => {
                if self.is_mobile() && self.contributor_area_status.is_open() {
                    self.contributor_area_status = PanelStatus::Closed;
                }
                self.cart_status = self.cart_status.flipped();
            }
            InterfaceAction::ToggleContributorArea => {
                self.contributor_area_status = self.next_contributor_area_status();
            }
            InterfaceAction::OpenContributorArea => {
                self.contributor_area_status = PanelStatus::Open;
            }
            InterfaceAction::ToggleProductImagesBrowser(Some(image)) => {
                self.product_images_browser_status = PanelStatus::Open;
                self.product_image_featured = Some(image);
            }
            InterfaceAction::ToggleProductImagesBrowser(None)
            | InterfaceAction::CloseProductImagesBrowser => {
                self.product_images_browser_status = PanelStatus::Closed;
            }
            InterfaceAction::FeatureProductImage(image) => {
                self.product_image_featured = image;
            }
            InterfaceAction::SetCurrentProductImages(images) => {
                self.current_product_images = images;
                self.product_image_featured = None;
            }
        }
    }

    /// First toggle closes on desktop and opens otherwise; later toggles flip.
    fn next_contributor_area_status(&self) -> PanelStatus {
        match self.contributor_area_status {
            PanelStatus::Initial if self.is_desktop() => PanelStatus::Closed,
            status => status.flipped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str) -> ProductImage {
        ProductImage {
            id: id.to_string(),
            src: format!("https://cdn.example/{id}.jpg"),
            alt_text: None,
        }
    }

    fn state(viewport: ViewportClass) -> InterfaceState {
        let mut state = InterfaceState::default();
        state.apply(InterfaceAction::SetViewport(viewport));
        state
    }

    #[test]
    fn test_defaults() {
        let state = InterfaceState::default();
        assert_eq!(state.viewport, None);
        assert_eq!(state.cart_status, PanelStatus::Initial);
        assert_eq!(state.contributor_area_status, PanelStatus::Initial);
        assert_eq!(state.product_images_browser_status, PanelStatus::Initial);
        assert!(!state.has_product_images());
    }

    #[test]
    fn test_cart_toggle_flips() {
        let mut state = state(ViewportClass::Desktop);
        state.apply(InterfaceAction::ToggleCart);
        assert_eq!(state.cart_status, PanelStatus::Open);
        state.apply(InterfaceAction::ToggleCart);
        assert_eq!(state.cart_status, PanelStatus::Closed);
    }

    #[test]
    fn test_cart_toggle_on_mobile_closes_contributor_area() {
        let mut state = state(ViewportClass::Mobile);
        state.contributor_area_status = PanelStatus::Open;

        state.apply(InterfaceAction::ToggleCart);

        assert_eq!(state.cart_status, PanelStatus::Open);
        assert_eq!(state.contributor_area_status, PanelStatus::Closed);
    }

    #[test]
    fn test_cart_toggle_on_desktop_leaves_contributor_area() {
        let mut state = state(ViewportClass::Desktop);
        state.contributor_area_status = PanelStatus::Open;

        state.apply(InterfaceAction::ToggleCart);

        assert_eq!(state.cart_status, PanelStatus::Open);
        assert_eq!(state.contributor_area_status, PanelStatus::Open);
    }

    #[test]
    fn test_cart_toggle_with_unknown_viewport_leaves_contributor_area() {
        let mut state = InterfaceState {
            contributor_area_status: PanelStatus::Open,
            ..InterfaceState::default()
        };
        state.apply(InterfaceAction::ToggleCart);
        assert_eq!(state.contributor_area_status, PanelStatus::Open);
    }

    #[test]
    fn test_first_contributor_toggle_depends_on_viewport() {
        let mut desktop = state(ViewportClass::Desktop);
        desktop.apply(InterfaceAction::ToggleContributorArea);
        assert_eq!(desktop.contributor_area_status, PanelStatus::Closed);

        let mut mobile = state(ViewportClass::Mobile);
        mobile.apply(InterfaceAction::ToggleContributorArea);
        assert_eq!(mobile.contributor_area_status, PanelStatus::Open);

        let mut unknown = InterfaceState::default();
        unknown.apply(InterfaceAction::ToggleContributorArea);
        assert_eq!(unknown.contributor_area_status, PanelStatus::Open);
    }

    #[test]
    fn test_later_contributor_toggles_flip() {
        let mut state = state(ViewportClass::Desktop);
        state.apply(InterfaceAction::ToggleContributorArea);
        state.apply(InterfaceAction::ToggleContributorArea);
        assert_eq!(state.contributor_area_status, PanelStatus::Open);
        state.apply(InterfaceAction::ToggleContributorArea);
        assert_eq!(state.contributor_area_status, PanelStatus::Closed);
    }

    #[test]
    fn test_image_browser_keeps_featured_image_when_closed() {
        let mut state = InterfaceState::default();

        state.apply(InterfaceAction::ToggleProductImagesBrowser(Some(image("x"))));
        assert_eq!(state.product_images_browser_status, PanelStatus::Open);
        assert_eq!(state.product_image_featured, Some(image("x")));

        state.apply(InterfaceAction::ToggleProductImagesBrowser(None));
        assert_eq!(state.product_images_browser_status, PanelStatus::Closed);
        assert_eq!(state.product_image_featured, Some(image("x")));
    }

    #[test]
    fn test_feature_image_leaves_visibility() {
        let mut state = InterfaceState::default();
        state.apply(InterfaceAction::FeatureProductImage(Some(image("y"))));
        assert_eq!(state.product_image_featured, Some(image("y")));
        assert_eq!(state.product_images_browser_status, PanelStatus::Initial);
    }

    #[test]
    fn test_set_current_images_clears_featured() {
        let mut state = InterfaceState::default();
        state.apply(InterfaceAction::ToggleProductImagesBrowser(Some(image("x"))));

        state.apply(InterfaceAction::SetCurrentProductImages(vec![
            image("a"),
            image("b"),
        ]));

        assert_eq!(state.current_product_images.len(), 2);
        assert!(state.has_product_images());
        assert_eq!(state.product_image_featured, None);
    }
}
