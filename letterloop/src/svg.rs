// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading traced SVG documents back onto the canvas.
//!
//! Tracers emit a very small subset of SVG: a root element with a size and view box,
//! optionally some groups with transforms, and filled paths. That's all this understands.

use std::str::FromStr;

use roxmltree::{Document, Node};

use crate::canvas::Canvas;
use crate::kurbo::{Affine, BezPath, Size};
use crate::peniko::Color;
use crate::peniko::color::{Srgb, palette, parse_color};
use crate::{Error, Result};

/// One filled path, already in document coordinates.
#[derive(Clone, Debug)]
pub struct FilledPath {
    pub path: BezPath,
    pub color: Color,
}

/// A parsed traced document.
#[derive(Clone, Debug)]
pub struct TracedSvg {
    pub size: Size,
    pub items: Vec<FilledPath>,
}

impl TracedSvg {
    pub fn parse(text: &str) -> Result<Self> {
        let doc = Document::parse(text)?;
        let root = doc.root_element();
        let width = root.attribute("width").and_then(parse_length);
        let height = root.attribute("height").and_then(parse_length);
        let view_box = root.attribute("viewBox").and_then(parse_view_box);

        let (size, transform) = match view_box {
            Some([x, y, vw, vh]) if vw > 0.0 && vh > 0.0 => {
                // A missing dimension follows the view box's aspect ratio.
                let w = width.or(height.map(|h| h * vw / vh)).unwrap_or(vw);
                let h = height.or(width.map(|w| w * vh / vw)).unwrap_or(vh);
                let transform =
                    Affine::scale_non_uniform(w / vw, h / vh) * Affine::translate((-x, -y));
                (Size::new(w, h), transform)
            }
            _ => (
                Size::new(width.unwrap_or(300.0), height.unwrap_or(150.0)),
                Affine::IDENTITY,
            ),
        };

        let mut items = Vec::new();
        parse_node(root, transform, Some(palette::css::BLACK), &mut items)?;
        Ok(Self { size, items })
    }

    /// Composite every path onto `canvas`, with the document origin at the canvas origin.
    pub fn draw(&self, canvas: &mut Canvas) {
        for item in &self.items {
            canvas.fill_path_with(&item.path, Affine::IDENTITY, item.color);
        }
    }
}

fn parse_node(
    node: Node<'_, '_>,
    transform: Affine,
    inherited_fill: Option<Color>,
    items: &mut Vec<FilledPath>,
) -> Result<()> {
    if !node.is_element() {
        return Ok(());
    }
    let fill = match node.attribute("fill") {
        Some("none") => None,
        Some(fill) => {
            let opacity = node
                .attribute("fill-opacity")
                .and_then(|o| f32::from_str(o).ok())
                .unwrap_or(1.0);
            Some(color(fill).multiply_alpha(opacity.clamp(0.0, 1.0)))
        }
        None => inherited_fill,
    };
    let transform = match node.attribute("transform") {
        Some(t) => transform * parse_transform(t),
        None => transform,
    };
    match node.tag_name().name() {
        "svg" | "g" => {
            for child in node.children() {
                parse_node(child, transform, fill, items)?;
            }
        }
        "path" => {
            let d = node
                .attribute("d")
                .ok_or(Error::SvgMissingAttribute("path", "d"))?;
            if let Some(color) = fill {
                let mut path = BezPath::from_svg(d)?;
                path.apply_affine(transform);
                items.push(FilledPath { path, color });
            }
        }
        other => log::warn!("Ignoring unsupported SVG element <{other}>"),
    }
    Ok(())
}

fn color(text: &str) -> Color {
    match parse_color(text) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(err) => {
            log::warn!("Couldn't parse color {text:?} ({err}), using black");
            palette::css::BLACK
        }
    }
}

fn parse_length(text: &str) -> Option<f64> {
    f64::from_str(text.trim().trim_end_matches("px")).ok()
}

fn numbers(text: &str) -> Option<Vec<f64>> {
    text.split([',', ' '])
        .filter(|s| !s.is_empty())
        .map(|s| f64::from_str(s.trim()).ok())
        .collect()
}

fn parse_view_box(text: &str) -> Option<[f64; 4]> {
    numbers(text)?.try_into().ok()
}

fn parse_transform(text: &str) -> Affine {
    let mut affine = Affine::IDENTITY;
    for part in text.split(')').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((name, args)) = part.split_once('(') else {
            log::warn!("Malformed transform {text:?}");
            return Affine::IDENTITY;
        };
        let Some(args) = numbers(args) else {
            log::warn!("Malformed transform arguments in {text:?}");
            return Affine::IDENTITY;
        };
        affine *= match (name.trim(), args.as_slice()) {
            ("translate", &[x]) => Affine::translate((x, 0.0)),
            ("translate", &[x, y]) => Affine::translate((x, y)),
            ("scale", &[s]) => Affine::scale(s),
            ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
            ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
            _ => {
                log::warn!("Unsupported transform {part:?})");
                Affine::IDENTITY
            }
        };
    }
    affine
}

#[cfg(test)]
mod tests {
    use super::{TracedSvg, parse_transform};
    use crate::Error;
    use crate::kurbo::{Affine, Point, Rect, Shape, Size};
    use crate::peniko::color::palette;

    fn bounds(svg: &TracedSvg, i: usize) -> Rect {
        svg.items[i].path.bounding_box()
    }

    #[test]
    fn reads_paths_and_fills() {
        let svg = TracedSvg::parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="3" viewBox="0 0 4 3"><path fill="#ff0000" d="M1 1 L3 1 L3 2 L1 2 Z"/></svg>"##,
        )
        .unwrap();
        assert_eq!(svg.size, Size::new(4.0, 3.0));
        assert_eq!(svg.items.len(), 1);
        assert_eq!(bounds(&svg, 0), Rect::new(1.0, 1.0, 3.0, 2.0));
        assert_eq!(
            svg.items[0].color.to_rgba8(),
            palette::css::RED.to_rgba8()
        );
    }

    #[test]
    fn view_box_and_groups_transform_paths() {
        let svg = TracedSvg::parse(
            r#"<svg width="200" height="100" viewBox="0 0 100 50">
                <g transform="translate(10, 5)" fill="blue">
                    <path d="M0 0 L10 0 L10 10 Z"/>
                    <path fill="none" d="M0 0 L1 1"/>
                </g>
            </svg>"#,
        )
        .unwrap();
        assert_eq!(svg.items.len(), 1);
        assert_eq!(bounds(&svg, 0), Rect::new(20.0, 10.0, 40.0, 30.0));
        assert_eq!(
            svg.items[0].color.to_rgba8(),
            palette::css::BLUE.to_rgba8()
        );
    }

    #[test]
    fn fill_defaults_to_black() {
        let svg = TracedSvg::parse(r#"<svg width="10" height="10"><path d="M0 0 L1 1"/></svg>"#)
            .unwrap();
        assert_eq!(
            svg.items[0].color.to_rgba8(),
            palette::css::BLACK.to_rgba8()
        );
    }

    #[test]
    fn missing_path_data_is_an_error() {
        let err = TracedSvg::parse(r#"<svg><path fill="red"/></svg>"#).unwrap_err();
        assert!(matches!(err, Error::SvgMissingAttribute("path", "d")));
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(TracedSvg::parse("<svg"), Err(Error::Svg(_))));
        assert!(matches!(
            TracedSvg::parse(r#"<svg><path d="M0 0 X1 1"/></svg>"#),
            Err(Error::SvgPath(_))
        ));
    }

    #[test]
    fn transform_lists_compose_left_to_right() {
        let affine = parse_transform("translate(10 0) scale(2)");
        assert_eq!(affine * Point::new(1.0, 1.0), Point::new(12.0, 2.0));
        assert_eq!(parse_transform("rotate(45)"), Affine::IDENTITY);
    }

    #[test]
    fn a_missing_dimension_follows_the_view_box() {
        let svg = TracedSvg::parse(
            r#"<svg width="200" viewBox="0 0 100 50"><path d="M0 0 L10 0 L10 10 Z"/></svg>"#,
        )
        .unwrap();
        assert_eq!(svg.size, Size::new(200.0, 100.0));
        assert_eq!(bounds(&svg, 0), Rect::new(0.0, 0.0, 20.0, 20.0));

        let svg = TracedSvg::parse(r#"<svg height="25" viewBox="10 0 100 50"/>"#).unwrap();
        assert_eq!(svg.size, Size::new(50.0, 25.0));
    }

    #[test]
    fn root_fill_and_transform_apply_to_children() {
        let svg = TracedSvg::parse(
            r#"<svg width="10" height="10" fill="red" transform="translate(1 2)">
                <path d="M0 0 L1 0 L1 1 Z"/>
            </svg>"#,
        )
        .unwrap();
        assert_eq!(
            svg.items[0].color.to_rgba8(),
            palette::css::RED.to_rgba8()
        );
        assert_eq!(bounds(&svg, 0), Rect::new(1.0, 2.0, 2.0, 3.0));
    }
}
