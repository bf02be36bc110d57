use viz_core::{AnalysisSettings, SampleSource};
use web_sys as web;

/// WebAudio analyser tapped off the page's `<audio>` element:
/// element -> source node -> analyser -> destination.
pub struct AnalyserSource {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    _source: web::MediaElementAudioSourceNode,
}

impl AnalyserSource {
    /// A media element can only be routed once per page, so this is called
    /// a single time on first playback.
    pub fn connect(media: &web::HtmlMediaElement) -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new()
            .map_err(|e| anyhow::anyhow!("AudioContext error: {:?}", e))?;
        let source = ctx
            .create_media_element_source(media)
            .map_err(|e| anyhow::anyhow!("media source error: {:?}", e))?;
        let analyser = web::AnalyserNode::new(&ctx)
            .map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| anyhow::anyhow!("connect error: {:?}", e))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("connect error: {:?}", e))?;
        log::info!("[audio] analyser connected, sample rate {}", ctx.sample_rate());
        Ok(Self {
            ctx,
            analyser,
            _source: source,
        })
    }

    /// Browsers start contexts suspended until a user gesture.
    pub fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }
}

impl SampleSource for AnalyserSource {
    fn configure(&mut self, settings: AnalysisSettings) {
        self.analyser.set_fft_size(settings.fft_size);
        self.analyser
            .set_smoothing_time_constant(settings.smoothing as f64);
        log::debug!(
            "[audio] fft={} smoothing={:.2}",
            settings.fft_size,
            settings.smoothing
        );
    }

    fn frequency_data(&mut self, out: &mut Vec<u8>) {
        out.resize(self.analyser.frequency_bin_count() as usize, 0);
        self.analyser.get_byte_frequency_data(out.as_mut_slice());
    }

    fn time_domain_data(&mut self, out: &mut Vec<u8>) {
        out.resize(self.analyser.fft_size() as usize, 128);
        self.analyser.get_byte_time_domain_data(out.as_mut_slice());
    }
}
