pub trait Paging {
    fn page_n_backward(&mut self, n: usize);
    fn page_n_forward(&mut self, n: usize);

    fn can_page_backward(&self) -> bool;
    fn can_page_forward(&self) -> bool;

    fn page_backward(&mut self) {
        self.page_n_backward(1);
    }

    fn page_forward(&mut self) {
        self.page_n_forward(1);
    }
}
