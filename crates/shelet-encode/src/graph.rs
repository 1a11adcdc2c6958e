//! Filter graph construction.
//!
//! The graph is built as explicit chains of named filter nodes connected by
//! named pads, then serialized to the expression syntax the external
//! transcoding engine expects. Building and serialization are separate so
//! the graph is testable without invoking the engine. A graph is built
//! fresh per render and submitted once.

use shelet_core::{EngineConfig, SheletError, SheletResult};

use crate::layout::LayoutPlan;

/// Output pad carrying the final composited video.
pub const VIDEO_OUT: &str = "vout";
/// Output pad carrying the processed audio.
pub const AUDIO_OUT: &str = "a_proc";

/// One filter with its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterNode {
    name: String,
    args: Vec<String>,
}

impl FilterNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn serialize(&self) -> String {
        if self.args.is_empty() {
            self.name.clone()
        } else {
            format!("{}={}", self.name, self.args.join(":"))
        }
    }
}

/// A linear run of filters between named input and output pads.
#[derive(Debug, Clone)]
struct FilterChain {
    inputs: Vec<String>,
    nodes: Vec<FilterNode>,
    outputs: Vec<String>,
}

/// The whole per-render graph.
#[derive(Debug, Clone, Default)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain reading `inputs` and writing `outputs`.
    pub fn chain(&mut self, inputs: &[&str], nodes: Vec<FilterNode>, outputs: &[&str]) {
        self.chains.push(FilterChain {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            nodes,
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        });
    }

    /// Serialize to the engine's `-filter_complex` expression.
    pub fn serialize(&self) -> String {
        self.chains
            .iter()
            .map(|chain| {
                let inputs: String = chain.inputs.iter().map(|p| format!("[{}]", p)).collect();
                let body: Vec<String> = chain.nodes.iter().map(FilterNode::serialize).collect();
                let outputs: String = chain.outputs.iter().map(|p| format!("[{}]", p)).collect();
                format!("{}{}{}", inputs, body.join(","), outputs)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Assemble the render graph for one layout plan.
///
/// Shape: cosmetic chain → split into a positioned, banner-masked main
/// branch and a dimmed filler band → alpha overlay → overlay artifact on
/// top, centered. The audio chain is built only when the source has audio.
pub fn build_graph(
    plan: &LayoutPlan,
    cfg: &EngineConfig,
    with_audio: bool,
) -> SheletResult<FilterGraph> {
    if plan.even_width % 2 != 0 || plan.even_height % 2 != 0 {
        return Err(SheletError::Graph(format!(
            "plan carries odd dimensions {}x{}",
            plan.even_width, plan.even_height
        )));
    }

    let w = plan.even_width;
    let canvas_h = cfg.canvas.height;
    let full_h = plan.crop_top + plan.even_height;
    let mask_h = cfg.banner.mask_height;

    let mut graph = FilterGraph::new();

    // (a) Cosmetic/anti-fingerprint chain on the source video.
    let tempo = cfg.encoder.tempo;
    graph.chain(
        &["0:v"],
        vec![
            FilterNode::new("setpts").arg(format!("PTS/{}", tempo)),
            FilterNode::new("crop").arg("in_w*0.96").arg("in_h*0.96"),
            FilterNode::new("scale").arg(w.to_string()).arg(full_h.to_string()),
            FilterNode::new("eq")
                .arg("gamma=1.03")
                .arg("saturation=1.05")
                .arg("contrast=1.02"),
            FilterNode::new("noise").arg("alls=1.5").arg("allf=t"),
            FilterNode::new("vignette").arg("PI/20"),
            FilterNode::new("unsharp").arg("3").arg("3").arg("0.5"),
        ],
        &["v_proc"],
    );

    // (b) Matching audio chain: tempo keeps sync with the setpts scale.
    if with_audio {
        graph.chain(
            &["0:a"],
            vec![
                FilterNode::new("atempo").arg(tempo.to_string()),
                FilterNode::new("volume").arg("0.98"),
                FilterNode::new("highpass").arg("f=15"),
                FilterNode::new("lowpass").arg("f=19000"),
            ],
            &[AUDIO_OUT],
        );
    }

    // (c) Split: positioned main branch with the banner rectangle painted
    // black, plus a dimmed filler band behind the banner region.
    graph.chain(&["v_proc"], vec![FilterNode::new("split")], &["v_main", "v_fill"]);

    let mut main_nodes = Vec::new();
    if plan.crop_top > 0 {
        main_nodes.push(
            FilterNode::new("crop")
                .arg(w.to_string())
                .arg(plan.even_height.to_string())
                .arg("0")
                .arg(plan.crop_top.to_string()),
        );
    }
    let pad_h = canvas_h.max(plan.top_y as u32 + plan.even_height);
    main_nodes.push(
        FilterNode::new("pad")
            .arg(w.to_string())
            .arg(pad_h.to_string())
            .arg("0")
            .arg(plan.top_y.to_string())
            .arg("black"),
    );
    if pad_h > canvas_h {
        main_nodes.push(
            FilterNode::new("crop")
                .arg(w.to_string())
                .arg(canvas_h.to_string())
                .arg("0")
                .arg("0"),
        );
    }
    main_nodes.push(
        FilterNode::new("drawbox")
            .arg("x=0")
            .arg("y=0")
            .arg(format!("w={}", w))
            .arg(format!("h={}", mask_h))
            .arg("color=black")
            .arg("t=fill"),
    );
    graph.chain(&["v_main"], main_nodes, &["v_masked"]);

    let band_h = mask_h.min(full_h);
    let band_off = (((full_h - band_h) / 2) as i32 + cfg.layout.filler_band_bias)
        .clamp(0, (full_h - band_h) as i32);
    graph.chain(
        &["v_fill"],
        vec![
            FilterNode::new("crop")
                .arg(w.to_string())
                .arg(band_h.to_string())
                .arg("0")
                .arg(band_off.to_string()),
            FilterNode::new("format").arg("rgba"),
            FilterNode::new("colorchannelmixer").arg("aa=0.25"),
        ],
        &["v_filler"],
    );

    graph.chain(
        &["v_masked", "v_filler"],
        vec![FilterNode::new("overlay").arg("0").arg("0")],
        &["v_staged"],
    );

    // (d) The overlay artifact, centered, on top of everything.
    graph.chain(
        &["v_staged", "1:v"],
        vec![FilterNode::new("overlay")
            .arg("(main_w-overlay_w)/2")
            .arg("(main_h-overlay_h)/2")],
        &[VIDEO_OUT],
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{plan, LayoutMode};
    use shelet_core::EngineConfig;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_node_serialization() {
        assert_eq!(FilterNode::new("split").serialize(), "split");
        assert_eq!(
            FilterNode::new("crop").arg("100").arg("200").serialize(),
            "crop=100:200"
        );
    }

    #[test]
    fn test_chain_serialization() {
        let mut graph = FilterGraph::new();
        graph.chain(
            &["0:v"],
            vec![FilterNode::new("setpts").arg("PTS/1.05")],
            &["v_proc"],
        );
        graph.chain(&["v_proc"], vec![FilterNode::new("split")], &["a", "b"]);
        assert_eq!(
            graph.serialize(),
            "[0:v]setpts=PTS/1.05[v_proc];[v_proc]split[a][b]"
        );
    }

    #[test]
    fn test_graph_contains_cosmetic_chain() {
        let cfg = cfg();
        let p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, true).unwrap().serialize();
        for fragment in [
            "setpts=PTS/1.05",
            "crop=in_w*0.96:in_h*0.96",
            "eq=gamma=1.03:saturation=1.05:contrast=1.02",
            "noise=alls=1.5:allf=t",
            "vignette=PI/20",
            "unsharp=3:3:0.5",
        ] {
            assert!(expr.contains(fragment), "missing {:?} in {}", fragment, expr);
        }
    }

    #[test]
    fn test_graph_audio_chain_matches_tempo() {
        let cfg = cfg();
        let p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, true).unwrap().serialize();
        assert!(expr.contains("[0:a]atempo=1.05,volume=0.98,highpass=f=15,lowpass=f=19000[a_proc]"));
    }

    #[test]
    fn test_graph_without_audio_omits_audio_chain() {
        let cfg = cfg();
        let p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, false).unwrap().serialize();
        assert!(!expr.contains("atempo"));
        assert!(!expr.contains("[a_proc]"));
    }

    #[test]
    fn test_graph_positions_main_branch_per_plan() {
        let cfg = cfg();
        let p = plan(1080, 1920, LayoutMode::Lower, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, true).unwrap().serialize();
        // The main branch crops the plan's top strip and pins at top_y.
        assert!(expr.contains(&format!(
            "crop=1080:{}:0:{}",
            p.even_height, p.crop_top
        )));
        assert!(expr.contains(&format!(":0:{}:black", p.top_y)));
        assert!(expr.contains("drawbox=x=0:y=0:w=1080:h=420:color=black:t=fill"));
    }

    #[test]
    fn test_graph_overlay_is_centered_on_top() {
        let cfg = cfg();
        let p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, true).unwrap().serialize();
        assert!(expr
            .ends_with("[v_staged][1:v]overlay=(main_w-overlay_w)/2:(main_h-overlay_h)/2[vout]"));
    }

    #[test]
    fn test_graph_filler_band_within_stream() {
        let cfg = cfg();
        // A short clip: the filler band offset must stay inside the stream.
        let p = plan(1080, 200, LayoutMode::Standard, &cfg).unwrap();
        let graph = build_graph(&p, &cfg, true).unwrap();
        let expr = graph.serialize();
        // full stream height is 200, so the band is clamped to it.
        assert!(expr.contains("crop=1080:200:0:0,format=rgba,colorchannelmixer=aa=0.25"));
    }

    #[test]
    fn test_neutral_tempo_serializes_plainly() {
        let mut cfg = cfg();
        cfg.encoder.tempo = 1.0;
        let p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        let expr = build_graph(&p, &cfg, true).unwrap().serialize();
        assert!(expr.contains("setpts=PTS/1,"));
        assert!(expr.contains("atempo=1,"));
    }

    #[test]
    fn test_graph_rejects_odd_dimensions() {
        let cfg = cfg();
        let mut p = plan(1920, 1080, LayoutMode::Standard, &cfg).unwrap();
        p.even_height += 1;
        assert!(matches!(
            build_graph(&p, &cfg, true),
            Err(SheletError::Graph(_))
        ));
    }
}
