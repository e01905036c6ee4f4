use cairo::{Context, Format, ImageSurface, Matrix};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::Rect;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawingLayer, Label, PathCommand, RenderFrame, Renderer, ShapeLayer, TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub shapes_drawn: usize,
    pub labels_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Supports offscreen image-surface rendering through `Renderer::render` and
/// in-place rendering on an external Cairo context through
/// `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for layer in &frame.layers {
            context
                .save()
                .map_err(|err| map_backend_error("failed to save context", err))?;
            if RenderFrame::scrolls_with_content(layer.kind) {
                context.translate(-frame.content_offset_x, 0.0);
            }
            draw_layer(context, layer, &mut stats)?;
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore context", err))?;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn draw_layer(
    context: &Context,
    layer: &DrawingLayer,
    stats: &mut CairoRenderStats,
) -> ChartResult<()> {
    draw_shape(context, &layer.shape)?;
    stats.shapes_drawn += 1;
    for overlay in &layer.overlays {
        draw_shape(context, overlay)?;
        stats.shapes_drawn += 1;
    }
    for label in layer.labels.iter().filter(|label| label.is_visible()) {
        draw_label(context, label)?;
        stats.labels_drawn += 1;
    }
    Ok(())
}

fn draw_shape(context: &Context, shape: &ShapeLayer) -> ChartResult<()> {
    if shape.path.is_empty() {
        return Ok(());
    }
    context.new_path();
    for command in shape.path.commands() {
        append_command(context, *command);
    }

    if let Some(fill) = shape.fill {
        apply_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
    }
    if let Some(stroke) = shape.stroke {
        apply_color(context, stroke.color);
        context.set_line_width(stroke.width);
        context.set_dash(stroke.pattern.dash_pattern(), 0.0);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke path", err))?;
    }
    context.new_path();
    Ok(())
}

fn append_command(context: &Context, command: PathCommand) {
    match command {
        PathCommand::MoveTo(point) => context.move_to(point.x, point.y),
        PathCommand::LineTo(point) => context.line_to(point.x, point.y),
        PathCommand::QuadTo { control, to } => {
            let (x0, y0) = context.current_point().unwrap_or((control.x, control.y));
            context.curve_to(
                x0 + 2.0 / 3.0 * (control.x - x0),
                y0 + 2.0 / 3.0 * (control.y - y0),
                to.x + 2.0 / 3.0 * (control.x - to.x),
                to.y + 2.0 / 3.0 * (control.y - to.y),
                to.x,
                to.y,
            );
        }
        PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        } => {
            if clockwise {
                context.arc(center.x, center.y, radius, start_angle, end_angle);
            } else {
                context.arc_negative(center.x, center.y, radius, start_angle, end_angle);
            }
        }
        PathCommand::Rect(rect) => {
            let rect = rect.standardized();
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
        }
        PathCommand::RoundedRect {
            rect,
            corner_radius,
        } => append_rounded_rect(context, rect.standardized(), corner_radius),
        PathCommand::Close => context.close_path(),
    }
}

fn append_rounded_rect(context: &Context, rect: Rect, corner_radius: f64) {
    let radius = corner_radius.min(rect.width * 0.5).min(rect.height * 0.5);
    if radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn draw_label(context: &Context, label: &Label) -> ChartResult<()> {
    context
        .save()
        .map_err(|err| map_backend_error("failed to save context", err))?;

    if let Some(transform) = label.transform {
        let cx = label.frame.center_x();
        let cy = label.frame.y + label.frame.height * 0.5;
        context.translate(cx, cy);
        context.transform(Matrix::new(
            transform.a,
            transform.b,
            transform.c,
            transform.d,
            transform.tx,
            transform.ty,
        ));
        context.translate(-cx, -cy);
    }

    if let Some(background) = label.background {
        apply_color(context, background.with_alpha(background.alpha * label.alpha));
        context.rectangle(
            label.frame.x,
            label.frame.y,
            label.frame.width,
            label.frame.height,
        );
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill label background", err))?;
    }

    let layout = pangocairo::functions::create_layout(context);
    let family = label.font.family.as_deref().unwrap_or("Sans");
    let weight = if label.font.bold { " Bold" } else { "" };
    let font_description =
        FontDescription::from_string(&format!("{family}{weight} {}px", label.font.size_px));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&label.text);

    let (text_width, _text_height) = layout.pixel_size();
    let text_width = f64::from(text_width);
    let x = match label.h_align {
        TextHAlign::Left => label.frame.x,
        TextHAlign::Center => label.frame.center_x() - text_width / 2.0,
        TextHAlign::Right => label.frame.x + label.frame.width - text_width,
    };

    apply_color(context, label.color.with_alpha(label.color.alpha * label.alpha));
    context.move_to(x, label.frame.y);
    pangocairo::functions::show_layout(context, &layout);

    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore context", err))?;
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
