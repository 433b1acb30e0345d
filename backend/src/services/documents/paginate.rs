//! Splits tall section images across A4 pages.
//!
//! Every section is scaled to the page width. A section taller than one page
//! continues on the following pages, each placement shifted up by one page
//! height, so every page shows the next slice of it. The PDF writer crops
//! each placement to that slice. Each section starts on a fresh page.

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// One image placement on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Zero-based page index in the output document.
    pub page: usize,
    /// Index of the section image being placed.
    pub section: usize,
    /// Distance of the image's top edge below the page's top edge. Zero on
    /// the first page of a section, negative on the following ones.
    pub top_mm: f64,
    /// Height of the whole image scaled to the page width.
    pub height_mm: f64,
}

/// Height of a `width_px` x `height_px` image scaled to the page width.
pub fn scaled_height(width_px: u32, height_px: u32) -> f64 {
    if width_px == 0 {
        return 0.0;
    }
    f64::from(height_px) * PAGE_WIDTH_MM / f64::from(width_px)
}

/// Placements for `sections`, given as pixel sizes, in output order.
pub fn paginate(sections: &[(u32, u32)]) -> Vec<Placement> {
    let mut placements = Vec::new();
    let mut page = 0;

    for (section, &(width_px, height_px)) in sections.iter().enumerate() {
        let height_mm = scaled_height(width_px, height_px);
        let mut top_mm = 0.0;
        placements.push(Placement {
            page,
            section,
            top_mm,
            height_mm,
        });

        let mut remaining = height_mm - PAGE_HEIGHT_MM;
        while remaining > 0.0 {
            top_mm -= PAGE_HEIGHT_MM;
            page += 1;
            placements.push(Placement {
                page,
                section,
                top_mm,
                height_mm,
            });
            remaining -= PAGE_HEIGHT_MM;
        }
        page += 1;
    }
    placements
}

pub fn page_count(placements: &[Placement]) -> usize {
    placements.iter().map(|p| p.page + 1).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_and_a_half_pages_take_three() {
        // 1485 * 210 / 420 = 742.5 mm = 2.5 pages
        assert_eq!(scaled_height(420, 1485), 2.5 * PAGE_HEIGHT_MM);
        let placements = paginate(&[(420, 1485)]);
        assert_eq!(page_count(&placements), 3);
        let offsets: Vec<f64> = placements.iter().map(|p| p.top_mm).collect();
        assert_eq!(offsets, vec![0.0, -297.0, -594.0]);
    }

    #[test]
    fn exactly_one_page_does_not_spill() {
        let placements = paginate(&[(210, 297)]);
        assert_eq!(placements.len(), 1);
        assert_eq!(page_count(&placements), 1);
    }

    #[test]
    fn short_section_takes_one_page() {
        let placements = paginate(&[(1792, 400)]);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].top_mm, 0.0);
    }

    #[test]
    fn sections_start_on_fresh_pages() {
        let placements = paginate(&[(420, 700), (420, 200)]);
        // 350 mm form section: two pages; terms on the third.
        assert_eq!(placements.len(), 3);
        assert_eq!((placements[1].page, placements[1].section), (1, 0));
        assert_eq!((placements[2].page, placements[2].section), (2, 1));
        assert_eq!(placements[2].top_mm, 0.0);
        assert_eq!(page_count(&placements), 3);
    }

    #[test]
    fn same_image_is_reused_on_every_page() {
        let placements = paginate(&[(420, 1485)]);
        assert!(placements.iter().all(|p| p.section == 0));
        assert!(placements.iter().all(|p| p.height_mm == 742.5));
    }
}
