//! DOM helpers for the membership form: reading input values and mapping
//! pointer positions onto the signature surface.

use common::model::membership::FieldId;
use common::signature::{Point, SURFACE_HEIGHT, SURFACE_WIDTH};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlTextAreaElement, MouseEvent, TouchEvent};
use yew::{classes, Classes};

use super::state::MembershipComponent;

/// Value of the `<input>` or `<textarea>` that fired `e`.
pub fn event_value(e: &Event) -> String {
    let Some(target) = e.target() else {
        return String::new();
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    target
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
        .unwrap_or_default()
}

/// First file of the `<input type="file">` that fired `e`.
pub fn event_file(e: &Event) -> Option<web_sys::File> {
    let input = e.target()?.dyn_into::<HtmlInputElement>().ok()?;
    let file = input.files()?.get(0);
    // Reset so choosing the same file again still fires `change`.
    input.set_value("");
    file
}

pub fn mouse_point(e: &MouseEvent) -> Option<Point> {
    let element = e.current_target()?.dyn_into::<Element>().ok()?;
    Some(surface_point(&element, e.client_x() as f64, e.client_y() as f64))
}

/// Position of the first touch. Also stops the page from scrolling while
/// signing.
pub fn touch_point(e: &TouchEvent) -> Option<Point> {
    e.prevent_default();
    let touch = e.touches().get(0)?;
    let element = e.current_target()?.dyn_into::<Element>().ok()?;
    Some(surface_point(&element, touch.client_x() as f64, touch.client_y() as f64))
}

fn surface_point(element: &Element, client_x: f64, client_y: f64) -> Point {
    let rect = element.get_bounding_client_rect();
    scale_to_surface(
        (client_x - rect.left(), client_y - rect.top()),
        (rect.width(), rect.height()),
    )
}

/// Maps an offset inside a displayed box of `size` CSS pixels onto surface
/// pixels. The surface may be shown scaled down on narrow screens.
pub fn scale_to_surface(offset: (f64, f64), size: (f64, f64)) -> Point {
    let sx = if size.0 > 0.0 { SURFACE_WIDTH as f64 / size.0 } else { 1.0 };
    let sy = if size.1 > 0.0 { SURFACE_HEIGHT as f64 / size.1 } else { 1.0 };
    Point::new((offset.0 * sx) as f32, (offset.1 * sy) as f32)
}

/// Border state of an input: red with an error, green once left valid.
pub fn field_classes(component: &MembershipComponent, field: FieldId) -> Classes {
    if component.session.error(field).is_some() {
        classes!("form-input", "error")
    } else if component.is_success(field) {
        classes!("form-input", "success")
    } else {
        classes!("form-input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_a_shrunken_surface() {
        let p = scale_to_surface((100.0, 20.0), (200.0, 40.0));
        assert_eq!(p, Point::new(200.0, 40.0));
    }

    #[test]
    fn zero_sized_box_keeps_offsets() {
        let p = scale_to_surface((12.0, 7.0), (0.0, 0.0));
        assert_eq!(p, Point::new(12.0, 7.0));
    }
}
