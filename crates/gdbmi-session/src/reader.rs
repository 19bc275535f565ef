use gdbmi_frame::{LineFramer, StreamSource};
use gdbmi_parse::{parse_line, response_is_finished, Record};
use tracing::debug;

/// Per-stream glue between the framer and the record classifier.
///
/// One instance per monitored stream. Feeding a chunk yields the records for
/// every line the chunk completes, in arrival order, each stamped with the
/// stream's source tag.
#[derive(Debug)]
pub struct StreamParser {
    framer: LineFramer,
}

impl StreamParser {
    pub fn new(source: StreamSource) -> Self {
        Self {
            framer: LineFramer::new(source),
        }
    }

    pub fn source(&self) -> StreamSource {
        self.framer.source()
    }

    /// Feed a chunk and parse every complete line it finishes.
    ///
    /// Blank lines and prompt-marker lines are dropped — batch boundaries
    /// are visible to direct callers through
    /// [`response_is_finished`](gdbmi_parse::response_is_finished). A line
    /// that fails classification is not an error at this layer: it is text
    /// printed by the program being debugged and is wrapped as an `output`
    /// record.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Record> {
        let mut records = Vec::new();
        for line in self.framer.feed(chunk) {
            if line.is_empty() {
                continue;
            }
            if response_is_finished(&line) {
                continue;
            }
            let mut record = match parse_line(&line) {
                Ok(record) => record,
                Err(err) => {
                    debug!(%err, "line is not MI output, wrapping as output record");
                    Record::output(line)
                }
            };
            record.source = Some(self.framer.source());
            records.push(record);
        }
        records
    }
}
