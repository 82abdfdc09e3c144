//! Presenter (C6): a stateless façade over an external graphics collaborator,
//! consumed through [`GraphicsSink`] so it is testable without a real display.

use crate::error::GraphicsError;
use crate::psi::pmt::LangTag;

/// The graphics collaborator's contract (§4.6, §6). Production wiring
/// supplies a real implementation elsewhere — rendering fonts or pixels is a
/// non-goal of this crate.
pub trait GraphicsSink {
    fn init(&mut self) -> Result<(), GraphicsError>;
    fn deinit(&mut self) -> Result<(), GraphicsError>;
    fn draw_channel_number(&mut self, n: u16) -> Result<(), GraphicsError>;
    fn draw_channel_number_message(&mut self, n: u16) -> Result<(), GraphicsError>;
    fn draw_channel_info(&mut self, n: u16, sub_count: usize, sub_tags: &[LangTag]) -> Result<(), GraphicsError>;
    fn draw_volume_info(&mut self, percent: f32) -> Result<(), GraphicsError>;
    fn commit(&mut self) -> Result<(), GraphicsError>;
    fn clear(&mut self, alpha: u8) -> Result<(), GraphicsError>;
}

/// Composes a requested frame against a [`GraphicsSink`] and commits it.
pub struct Presenter<'a> {
    sink: &'a mut dyn GraphicsSink,
}

impl<'a> Presenter<'a> {
    pub fn new(sink: &'a mut dyn GraphicsSink) -> Presenter<'a> {
        Presenter { sink }
    }

    /// `n` is the 1-based user-visible channel number.
    pub fn show_channel_info(&mut self, n: u16, sub_tags: &[LangTag]) -> Result<(), GraphicsError> {
        self.sink.draw_channel_info(n, sub_tags.len(), sub_tags)?;
        self.sink.commit()
    }

    pub fn show_volume(&mut self, percent: f32) -> Result<(), GraphicsError> {
        self.sink.draw_volume_info(percent)?;
        self.sink.commit()
    }

    pub fn show_channel_number(&mut self, n: u16) -> Result<(), GraphicsError> {
        self.sink.draw_channel_number(n)?;
        self.sink.commit()
    }

    pub fn show_no_such_channel(&mut self, n: u16) -> Result<(), GraphicsError> {
        self.sink.draw_channel_number_message(n)?;
        self.sink.commit()
    }

    pub fn clear(&mut self, alpha: u8) -> Result<(), GraphicsError> {
        self.sink.clear(alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
    }

    impl GraphicsSink for RecordingSink {
        fn init(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("init".into());
            Ok(())
        }
        fn deinit(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("deinit".into());
            Ok(())
        }
        fn draw_channel_number(&mut self, n: u16) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_number({n})"));
            Ok(())
        }
        fn draw_channel_number_message(&mut self, n: u16) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_number_message({n})"));
            Ok(())
        }
        fn draw_channel_info(&mut self, n: u16, sub_count: usize, _sub_tags: &[LangTag]) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_channel_info({n},{sub_count})"));
            Ok(())
        }
        fn draw_volume_info(&mut self, percent: f32) -> Result<(), GraphicsError> {
            self.calls.push(format!("draw_volume_info({percent})"));
            Ok(())
        }
        fn commit(&mut self) -> Result<(), GraphicsError> {
            self.calls.push("commit".into());
            Ok(())
        }
        fn clear(&mut self, alpha: u8) -> Result<(), GraphicsError> {
            self.calls.push(format!("clear({alpha})"));
            Ok(())
        }
    }

    #[test]
    fn show_channel_info_draws_then_commits() {
        let mut sink = RecordingSink::default();
        let mut presenter = Presenter::new(&mut sink);
        presenter.show_channel_info(3, &[*b"eng", *b"ger"]).unwrap();
        assert_eq!(sink.calls, vec!["draw_channel_info(3,2)".to_string(), "commit".to_string()]);
    }

    #[test]
    fn show_no_such_channel_uses_the_message_variant() {
        let mut sink = RecordingSink::default();
        let mut presenter = Presenter::new(&mut sink);
        presenter.show_no_such_channel(9).unwrap();
        assert_eq!(sink.calls, vec!["draw_channel_number_message(9)".to_string(), "commit".to_string()]);
    }

    #[test]
    fn show_volume_forwards_percent() {
        let mut sink = RecordingSink::default();
        let mut presenter = Presenter::new(&mut sink);
        presenter.show_volume(0.45).unwrap();
        assert_eq!(sink.calls[0], "draw_volume_info(0.45)");
    }
}
