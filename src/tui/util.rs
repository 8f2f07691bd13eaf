use ratatui::layout::{Flex, Layout, Rect, Size};

/// Return a `Rect` of the given size centered within `area`, shrunk to fit if
/// `area` is too small
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Format a number of seconds as `M:SS`
pub(crate) fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Size::new(20, 10), Rect::new(30, 7, 20, 10))]
    #[case(Rect::new(10, 5, 20, 10), Size::new(20, 10), Rect::new(10, 5, 20, 10))]
    #[case(Rect::new(0, 0, 10, 4), Size::new(20, 10), Rect::new(0, 0, 10, 4))]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] rect: Rect) {
        assert_eq!(center_rect(area, size), rect);
    }

    #[rstest]
    #[case(120, "2:00")]
    #[case(119, "1:59")]
    #[case(61, "1:01")]
    #[case(9, "0:09")]
    #[case(0, "0:00")]
    fn test_format_time(#[case] secs: u32, #[case] s: &str) {
        assert_eq!(format_time(secs), s);
    }
}
