//! Scanlines

/// Horizontal run of pixels
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Span {
    /// First pixel
    pub x: i64,
    /// Number of pixels, at least 1
    pub len: i64,
}

impl Span {
    /// Last pixel, inclusive
    pub fn last(&self) -> i64 {
        self.x + self.len - 1
    }
}

/// Covered pixels of a single row (y)
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Scanline {
    pub y: i64,
    pub spans: Vec<Span>,
}

impl Scanline {
    pub fn new(y: i64) -> Self {
        Self { y, spans: vec![] }
    }
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }
    /// Add the pixels from x1 to x2, inclusive
    ///
    /// Empty runs (x2 < x1) are ignored
    pub fn add_span(&mut self, x1: i64, x2: i64) {
        if x2 >= x1 {
            self.spans.push( Span { x: x1, len: x2 - x1 + 1 } );
        }
    }
    /// Add a single pixel
    pub fn add_cell(&mut self, x: i64) {
        self.add_span(x, x);
    }
    /// Clip spans to [0, width) then sort and merge touching spans
    pub fn finalize(&mut self, width: usize) {
        let xmax = width as i64 - 1;
        let mut spans : Vec<Span> = self.spans.iter()
            .filter(|s| s.last() >= 0 && s.x <= xmax)
            .map(|s| {
                let x1 = s.x.max(0);
                let x2 = s.last().min(xmax);
                Span { x: x1, len: x2 - x1 + 1 }
            })
            .collect();
        spans.sort_by_key(|s| s.x);

        let mut merged : Vec<Span> = Vec::with_capacity(spans.len());
        for s in spans {
            match merged.last_mut() {
                Some(cur) if s.x <= cur.last() + 1 => {
                    cur.len = cur.len.max(s.last() - cur.x + 1);
                }
                _ => merged.push(s),
            }
        }
        self.spans = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_and_clip() {
        let mut sl = Scanline::new(3);
        sl.add_span(4, 6);
        sl.add_cell(7);
        sl.add_cell(-1);
        sl.add_span(-5, 1);
        sl.add_span(9, 12);
        sl.add_span(5, 4);
        sl.finalize(11);
        assert_eq!(sl.spans, vec![Span { x: 0, len: 2 },
                                  Span { x: 4, len: 4 },
                                  Span { x: 9, len: 2 }]);
    }

    #[test]
    fn outside_is_dropped() {
        let mut sl = Scanline::new(0);
        sl.add_span(-4, -1);
        sl.add_span(10, 20);
        sl.finalize(10);
        assert_eq!(sl.num_spans(), 0);
    }
}
