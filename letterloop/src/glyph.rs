// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke geometry for the uppercase Latin letters.
//!
//! Each [`Glyph`] is a list of disjoint polylines authored in a 100×100 design square
//! (origin top-left, y down). The ink of most letters spans the middle 60 to 70 units
//! horizontally and 10..=90 vertically; the tail of `Q` dips to 95.
//!
//! The table is pure data. Stroking it is the job of [`draw_glyph`](crate::draw_glyph),
//! which maps the design square onto a box on the drawing surface.

use core::fmt;

use crate::kurbo::{BezPath, Point, Rect};

/// Width and height of the square glyph geometry is authored in.
pub const DESIGN_SIZE: f64 = 100.0;

/// One of the 26 uppercase Latin letters.
///
/// This is the only way to look up a [`Glyph`], so every value that classifies as a letter
/// is guaranteed to have geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(u8);

impl Letter {
    /// Case-folds `ch` to a letter, if it is an ASCII letter.
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_alphabetic() {
            Some(Self(ch.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    /// The uppercase character for this letter.
    pub fn to_char(self) -> char {
        char::from(b'A' + self.0)
    }

    /// The stroke geometry for this letter.
    pub fn glyph(self) -> &'static Glyph {
        &GLYPHS[usize::from(self.0)]
    }

    /// All letters, `A` through `Z`.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..26).map(Self)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The stroke geometry of one letter.
#[derive(Debug)]
pub struct Glyph {
    subpaths: &'static [&'static [(f64, f64)]],
}

impl Glyph {
    /// The polylines making up this glyph, in design square coordinates.
    ///
    /// Each subpath starts with a pen-up move to its first point.
    pub fn subpaths(&self) -> impl Iterator<Item = impl Iterator<Item = Point> + '_> + '_ {
        self.subpaths
            .iter()
            .map(|subpath| subpath.iter().map(|&(x, y)| Point::new(x, y)))
    }

    /// The number of disjoint polylines.
    pub fn subpath_count(&self) -> usize {
        self.subpaths.len()
    }

    /// Build the glyph as a path in design square coordinates.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for subpath in self.subpaths() {
            let mut points = subpath;
            let Some(start) = points.next() else {
                continue;
            };
            path.move_to(start);
            for point in points {
                path.line_to(point);
            }
        }
        path
    }

    /// The bounding box of every point in the glyph, ignoring stroke width.
    pub fn bounding_box(&self) -> Rect {
        self.subpaths()
            .flatten()
            .map(|p| Rect::from_points(p, p))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}

/// Look up the geometry for a character, folding lowercase letters to uppercase.
///
/// Returns `None` for anything outside `A..=Z` and `a..=z`.
pub fn geometry(ch: char) -> Option<&'static Glyph> {
    Letter::from_char(ch).map(Letter::glyph)
}

const O_RING: &[(f64, f64)] = &[
    (30.0, 10.0),
    (70.0, 10.0),
    (80.0, 25.0),
    (80.0, 75.0),
    (70.0, 90.0),
    (30.0, 90.0),
    (20.0, 75.0),
    (20.0, 25.0),
    (30.0, 10.0),
];

const P_BOWL: &[(f64, f64)] = &[
    (15.0, 90.0),
    (15.0, 10.0),
    (65.0, 10.0),
    (80.0, 22.0),
    (80.0, 40.0),
    (65.0, 52.0),
    (15.0, 52.0),
];

static GLYPHS: [Glyph; 26] = [
    // A
    Glyph {
        subpaths: &[
            &[(15.0, 90.0), (50.0, 10.0), (85.0, 90.0)],
            &[(30.0, 60.0), (70.0, 60.0)],
        ],
    },
    // B
    Glyph {
        subpaths: &[
            &[
                (15.0, 10.0),
                (15.0, 90.0),
                (62.0, 90.0),
                (78.0, 80.0),
                (78.0, 60.0),
                (62.0, 50.0),
                (15.0, 50.0),
            ],
            &[
                (15.0, 10.0),
                (60.0, 10.0),
                (74.0, 20.0),
                (74.0, 40.0),
                (60.0, 50.0),
            ],
        ],
    },
    // C
    Glyph {
        subpaths: &[&[
            (80.0, 20.0),
            (70.0, 10.0),
            (30.0, 10.0),
            (20.0, 25.0),
            (20.0, 75.0),
            (30.0, 90.0),
            (70.0, 90.0),
            (80.0, 80.0),
        ]],
    },
    // D
    Glyph {
        subpaths: &[&[
            (15.0, 10.0),
            (15.0, 90.0),
            (65.0, 90.0),
            (85.0, 70.0),
            (85.0, 30.0),
            (65.0, 10.0),
            (15.0, 10.0),
        ]],
    },
    // E
    Glyph {
        subpaths: &[
            &[(80.0, 10.0), (15.0, 10.0), (15.0, 90.0), (80.0, 90.0)],
            &[(15.0, 50.0), (65.0, 50.0)],
        ],
    },
    // F
    Glyph {
        subpaths: &[
            &[(80.0, 10.0), (15.0, 10.0), (15.0, 90.0)],
            &[(15.0, 50.0), (65.0, 50.0)],
        ],
    },
    // G
    Glyph {
        subpaths: &[&[
            (80.0, 20.0),
            (70.0, 10.0),
            (30.0, 10.0),
            (20.0, 25.0),
            (20.0, 75.0),
            (30.0, 90.0),
            (70.0, 90.0),
            (80.0, 80.0),
            (80.0, 55.0),
            (55.0, 55.0),
        ]],
    },
    // H
    Glyph {
        subpaths: &[
            &[(15.0, 10.0), (15.0, 90.0)],
            &[(85.0, 10.0), (85.0, 90.0)],
            &[(15.0, 50.0), (85.0, 50.0)],
        ],
    },
    // I
    Glyph {
        subpaths: &[
            &[(50.0, 10.0), (50.0, 90.0)],
            &[(30.0, 10.0), (70.0, 10.0)],
            &[(30.0, 90.0), (70.0, 90.0)],
        ],
    },
    // J
    Glyph {
        subpaths: &[
            &[(40.0, 10.0), (75.0, 10.0)],
            &[
                (65.0, 10.0),
                (65.0, 80.0),
                (55.0, 90.0),
                (30.0, 90.0),
                (20.0, 80.0),
                (20.0, 70.0),
            ],
        ],
    },
    // K
    Glyph {
        subpaths: &[
            &[(15.0, 10.0), (15.0, 90.0)],
            &[(80.0, 10.0), (15.0, 55.0)],
            &[(35.0, 42.0), (80.0, 90.0)],
        ],
    },
    // L
    Glyph {
        subpaths: &[&[(15.0, 10.0), (15.0, 90.0), (80.0, 90.0)]],
    },
    // M
    Glyph {
        subpaths: &[&[
            (15.0, 90.0),
            (15.0, 10.0),
            (50.0, 55.0),
            (85.0, 10.0),
            (85.0, 90.0),
        ]],
    },
    // N
    Glyph {
        subpaths: &[&[(15.0, 90.0), (15.0, 10.0), (85.0, 90.0), (85.0, 10.0)]],
    },
    // O
    Glyph {
        subpaths: &[O_RING],
    },
    // P
    Glyph {
        subpaths: &[P_BOWL],
    },
    // Q
    Glyph {
        subpaths: &[O_RING, &[(60.0, 70.0), (85.0, 95.0)]],
    },
    // R
    Glyph {
        subpaths: &[P_BOWL, &[(50.0, 52.0), (85.0, 90.0)]],
    },
    // S
    Glyph {
        subpaths: &[&[
            (80.0, 20.0),
            (70.0, 10.0),
            (30.0, 10.0),
            (20.0, 20.0),
            (20.0, 40.0),
            (30.0, 50.0),
            (70.0, 50.0),
            (80.0, 60.0),
            (80.0, 80.0),
            (70.0, 90.0),
            (30.0, 90.0),
            (20.0, 80.0),
        ]],
    },
    // T
    Glyph {
        subpaths: &[&[(15.0, 10.0), (85.0, 10.0)], &[(50.0, 10.0), (50.0, 90.0)]],
    },
    // U
    Glyph {
        subpaths: &[&[
            (20.0, 10.0),
            (20.0, 75.0),
            (30.0, 90.0),
            (70.0, 90.0),
            (80.0, 75.0),
            (80.0, 10.0),
        ]],
    },
    // V
    Glyph {
        subpaths: &[&[(15.0, 10.0), (50.0, 90.0), (85.0, 10.0)]],
    },
    // W
    Glyph {
        subpaths: &[&[
            (10.0, 10.0),
            (28.0, 90.0),
            (50.0, 35.0),
            (72.0, 90.0),
            (90.0, 10.0),
        ]],
    },
    // X
    Glyph {
        subpaths: &[&[(20.0, 10.0), (80.0, 90.0)], &[(80.0, 10.0), (20.0, 90.0)]],
    },
    // Y
    Glyph {
        subpaths: &[
            &[(15.0, 10.0), (50.0, 50.0), (85.0, 10.0)],
            &[(50.0, 50.0), (50.0, 90.0)],
        ],
    },
    // Z
    Glyph {
        subpaths: &[&[(20.0, 10.0), (80.0, 10.0), (20.0, 90.0), (80.0, 90.0)]],
    },
];

#[cfg(test)]
mod tests {
    use super::{DESIGN_SIZE, Letter, geometry};
    use crate::kurbo::Rect;

    #[test]
    fn every_letter_has_ink_inside_the_design_square() {
        let square = Rect::new(0.0, 0.0, DESIGN_SIZE, DESIGN_SIZE);
        for letter in Letter::all() {
            let glyph = letter.glyph();
            assert!(glyph.subpath_count() > 0, "{letter} has no subpaths");
            for subpath in glyph.subpaths() {
                let points: Vec<_> = subpath.collect();
                assert!(points.len() >= 2, "{letter} has a degenerate subpath");
                for p in points {
                    assert!(square.contains(p), "{letter} has {p:?} outside the square");
                }
            }
        }
    }

    #[test]
    fn glyphs_are_distinct() {
        let shapes: Vec<Vec<(u64, u64)>> = Letter::all()
            .map(|letter| {
                letter
                    .glyph()
                    .subpaths()
                    .flatten()
                    .map(|p| (p.x.to_bits(), p.y.to_bits()))
                    .collect()
            })
            .collect();
        for (i, a) in shapes.iter().enumerate() {
            for (j, b) in shapes.iter().enumerate().skip(i + 1) {
                assert_ne!(a, b, "glyphs {i} and {j} are identical");
            }
        }
    }

    #[test]
    fn lookup_folds_case() {
        assert_eq!(Letter::from_char('q'), Letter::from_char('Q'));
        assert_eq!(Letter::from_char('a').map(Letter::to_char), Some('A'));
        assert_eq!(Letter::from_char('z').map(Letter::to_char), Some('Z'));
        assert!(core::ptr::eq(
            geometry('k').unwrap(),
            geometry('K').unwrap()
        ));
    }

    #[test]
    fn non_letters_have_no_geometry() {
        for ch in ['1', ' ', '-', 'é', 'ß', '\n', '@', '['] {
            assert!(geometry(ch).is_none(), "{ch:?} should have no glyph");
        }
    }

    #[test]
    fn paths_have_one_move_per_subpath() {
        use crate::kurbo::PathEl;
        for letter in Letter::all() {
            let glyph = letter.glyph();
            let moves = glyph
                .to_path()
                .elements()
                .iter()
                .filter(|el| matches!(el, PathEl::MoveTo(_)))
                .count();
            assert_eq!(moves, glyph.subpath_count(), "{letter}");
        }
    }

    #[test]
    fn letters_are_taller_than_wide() {
        for letter in Letter::all() {
            let bbox = letter.glyph().bounding_box();
            assert!(bbox.height() >= 80.0, "{letter}: {bbox:?}");
            assert!(bbox.width() <= bbox.height(), "{letter}: {bbox:?}");
        }
    }
}
