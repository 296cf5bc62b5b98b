// World map rendering module
//
// Renders the world outline with one great circle arc per live connection,
// drawn from the remote endpoint to the host. Arc color encodes direction
// and is blended toward the background as the arc fades.

use crate::app::config::GREAT_CIRCLE_SEGMENTS;
use crate::app::DisplaySession;
use crate::net::Direction;
use crate::theme::{arc_color, BONE_WHITE, MAP_BACKGROUND, NEON_PURPLE, PUMPKIN_ORANGE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution},
        Block, BorderType, Borders,
    },
    Frame,
};

const ENDPOINT_SYMBOL: &str = "•";
const HOST_SYMBOL: &str = "◆";

/// Coastline color, dimmed so arcs stand out
const COASTLINE: Color = Color::Rgb(68, 72, 100);

/// A (longitude, latitude) point in canvas space
pub type MapPoint = (f64, f64);

/// Points along the great circle from `from` to `to`, both given as (lat, lon)
///
/// Returns `segments + 1` points as (lon, lat) with longitudes normalized to
/// [-180, 180]. Coincident endpoints collapse to a single point.
pub fn great_circle_points(from: (f64, f64), to: (f64, f64), segments: usize) -> Vec<MapPoint> {
    let segments = segments.max(1);
    let a = to_unit_vector(from);
    let b = to_unit_vector(to);

    let dot = (a.0 * b.0 + a.1 * b.1 + a.2 * b.2).clamp(-1.0, 1.0);
    let angle = dot.acos();

    if angle < 1e-9 {
        return vec![(normalize_lon(from.1), from.0)];
    }

    let sin_angle = angle.sin();
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            if sin_angle.abs() < 1e-9 {
                // Antipodal endpoints have no unique great circle
                let lat = from.0 + (to.0 - from.0) * t;
                let lon = from.1 + (to.1 - from.1) * t;
                return (normalize_lon(lon), lat);
            }
            let wa = ((1.0 - t) * angle).sin() / sin_angle;
            let wb = (t * angle).sin() / sin_angle;
            from_unit_vector((
                wa * a.0 + wb * b.0,
                wa * a.1 + wb * b.1,
                wa * a.2 + wb * b.2,
            ))
        })
        .collect()
}

/// Split a polyline wherever it wraps across the antimeridian
///
/// Each crossing gets an interpolated point on both map edges so the two
/// halves meet the border instead of stopping short of it.
pub fn split_at_antimeridian(points: &[MapPoint]) -> Vec<Vec<MapPoint>> {
    let mut runs = Vec::new();
    let mut current: Vec<MapPoint> = Vec::new();

    for &(lon, lat) in points {
        if let Some(&(prev_lon, prev_lat)) = current.last() {
            let delta = lon - prev_lon;
            if delta.abs() > 180.0 {
                let edge = if delta > 0.0 { -180.0 } else { 180.0 };
                let unwrapped = if delta > 0.0 { lon - 360.0 } else { lon + 360.0 };
                let span = unwrapped - prev_lon;
                let t = if span.abs() > f64::EPSILON {
                    (edge - prev_lon) / span
                } else {
                    0.0
                };
                let crossing_lat = prev_lat + (lat - prev_lat) * t;

                current.push((edge, crossing_lat));
                runs.push(std::mem::take(&mut current));
                current.push((-edge, crossing_lat));
            }
        }
        current.push((lon, lat));
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn to_unit_vector((lat, lon): (f64, f64)) -> (f64, f64, f64) {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn from_unit_vector((x, y, z): (f64, f64, f64)) -> MapPoint {
    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lon = y.atan2(x).to_degrees();
    (normalize_lon(lon), lat)
}

fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // Keep an input of exactly 180 on the eastern edge
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// Precomputed geometry for one arc
struct ArcSketch {
    runs: Vec<Vec<MapPoint>>,
    remote: MapPoint,
    color: Color,
    label: Option<String>,
}

pub fn render_world_map(f: &mut Frame, area: Rect, session: &DisplaySession) {
    let labels_enabled = session.map_settings.labels_enabled;
    let host = session.host().location.coords();
    let host_point = (host.1, host.0);

    // Oldest first so the freshest arcs are painted on top
    let sketches: Vec<ArcSketch> = session
        .live_arcs()
        .iter()
        .map(|arc| ArcSketch {
            runs: split_at_antimeridian(&great_circle_points(
                arc.endpoint_a,
                arc.endpoint_b,
                GREAT_CIRCLE_SEGMENTS,
            )),
            remote: (arc.endpoint_a.1, arc.endpoint_a.0),
            color: arc_color(arc.direction, arc.opacity()),
            label: arc.label.clone(),
        })
        .collect();
    let is_empty = sketches.is_empty();

    let outbound = session
        .live_arcs()
        .iter()
        .filter(|arc| arc.direction == Direction::Outbound)
        .count();
    let inbound = sketches.len() - outbound;
    let title = format!(" World Traffic ({} out / {} in) ", outbound, inbound);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(NEON_PURPLE)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .background_color(MAP_BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: COASTLINE,
            });
            ctx.layer();

            for sketch in &sketches {
                for run in &sketch.runs {
                    for pair in run.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0].0,
                            y1: pair[0].1,
                            x2: pair[1].0,
                            y2: pair[1].1,
                            color: sketch.color,
                        });
                    }
                }
            }

            for sketch in &sketches {
                let (x, y) = sketch.remote;
                ctx.print(
                    x,
                    y,
                    Span::styled(ENDPOINT_SYMBOL, Style::default().fg(sketch.color)),
                );
                if labels_enabled {
                    if let Some(label) = &sketch.label {
                        ctx.print(
                            x + 3.0,
                            y,
                            Span::styled(label.clone(), Style::default().fg(sketch.color)),
                        );
                    }
                }
            }

            ctx.print(
                host_point.0,
                host_point.1,
                Span::styled(
                    HOST_SYMBOL,
                    Style::default()
                        .fg(PUMPKIN_ORANGE)
                        .add_modifier(Modifier::BOLD),
                ),
            );

            if is_empty {
                ctx.print(
                    -40.0,
                    -75.0,
                    Span::styled(
                        "Waiting for traffic...",
                        Style::default().fg(BONE_WHITE).add_modifier(Modifier::ITALIC),
                    ),
                );
            }
        });

    f.render_widget(canvas, area);
}
